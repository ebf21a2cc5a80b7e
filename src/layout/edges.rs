use super::*;

/// Connects every non-root slot to its ancestor slot.
///
/// Runs strictly after [`TreeLayoutEngine`] so both endpoints carry their
/// final root-coordinate bounds. Connectors leave the child's top centre,
/// jog horizontally above it, then drop onto the ancestor's bottom centre.
pub(super) fn build_edges(
    slots: &[SlotLayout],
    doc: &ProcessDocument,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Vec<EdgeLayout>, LayoutError> {
    let mut edges = Vec::new();
    for slot in slots {
        let Some(ancestor_idx) = slot.ancestor else {
            continue;
        };
        let ancestor = slots
            .get(ancestor_idx)
            .filter(|ancestor| slot.ancestor_id.as_deref() == Some(ancestor.id.as_str()))
            .ok_or_else(|| LayoutError::MissingAncestor {
                id: slot.id.clone(),
                ancestor: ancestor_idx,
            })?;

        let start = (slot.bounds.center_x(), slot.bounds.y);
        let jog_y = start.1 - config.edge_jog;
        let end = (ancestor.bounds.center_x(), ancestor.bounds.bottom());
        let points = vec![start, (start.0, jog_y), (end.0, jog_y), end];

        let anchor = (start.0, jog_y - ANSWER_LABEL_GAP);
        let answer = answer_label(ancestor, slot, doc, theme, config, anchor);
        edges.push(EdgeLayout {
            from_slot: ancestor.index,
            to_slot: slot.index,
            from: ancestor.id.clone(),
            to: slot.id.clone(),
            points,
            answer,
        });
    }
    Ok(edges)
}

fn answer_label(
    ancestor: &SlotLayout,
    slot: &SlotLayout,
    doc: &ProcessDocument,
    theme: &Theme,
    config: &LayoutConfig,
    anchor: (f32, f32),
) -> Option<AnswerLabel> {
    let node = doc.graph.get(&ancestor.id)?;
    node.answers.as_ref()?;
    let branch = slot.branch?;
    if node.next.get(branch) != Some(&slot.id) {
        return None;
    }
    let answer = node.answer_for(branch)?;
    let text = answer.resolve(&doc.phrases).map(str::to_string);
    if text.is_none() {
        log::warn!(
            "answer {} of \"{}\" refers to an unknown phrase",
            branch,
            ancestor.id
        );
    }
    let block = text
        .as_deref()
        .map(|text| measure_label(text, theme, config));
    Some(AnswerLabel {
        raw: answer.raw().into_owned(),
        text,
        block,
        anchor,
    })
}
