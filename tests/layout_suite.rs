use std::path::Path;

use process_tree_renderer::{
    InputSyntax, Layout, LayoutConfig, LayoutError, ProcessDocument, RenderConfig, Theme,
    compute_layout, parse_process_with, render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert_eq!(
        svg.matches("<g").count(),
        svg.matches("</g>").count(),
        "{fixture}: unbalanced groups"
    );
}

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..Default::default()
    }
}

fn load_fixture(rel: &str) -> ProcessDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let syntax = if rel.ends_with(".json5") {
        InputSyntax::Json5
    } else {
        InputSyntax::Json
    };
    parse_process_with(&input, syntax).expect("parse failed")
}

fn layout_fixture(rel: &str) -> Layout {
    let doc = load_fixture(rel);
    compute_layout(&doc, &Theme::classic(), &layout_config()).expect("layout failed")
}

fn ids(layout: &Layout) -> Vec<&str> {
    layout.slots.iter().map(|slot| slot.id.as_str()).collect()
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["choice.json", "loops.json", "shared.json", "commented.json5"];
    let theme = Theme::modern();
    for rel in candidates {
        let doc = load_fixture(rel);
        let layout = compute_layout(&doc, &theme, &layout_config()).expect("layout failed");
        let svg = render_svg(&layout, &theme, &RenderConfig::default()).expect("render failed");
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn every_non_root_slot_has_one_connector() {
    for rel in ["choice.json", "loops.json", "shared.json", "commented.json5"] {
        let layout = layout_fixture(rel);
        assert_eq!(layout.edges.len(), layout.slots.len() - 1, "{rel}");
        for slot in layout.slots.iter().skip(1) {
            let count = layout
                .edges
                .iter()
                .filter(|edge| edge.to_slot == slot.index)
                .count();
            assert_eq!(count, 1, "{rel}: slot {} ({})", slot.index, slot.id);
        }
    }
}

#[test]
fn choice_fixture_resolves_phrases_and_answers() {
    let layout = layout_fixture("choice.json");
    assert_eq!(ids(&layout), ["start", "ask", "advice", "end", "end"]);
    assert_eq!(layout.root_width, 2);

    let root = layout.root().unwrap();
    assert_eq!(root.text.as_deref(), Some("Welcome to the checker"));
    assert_eq!(root.role, "Instruction");

    let yes = layout.edge_between("ask", "advice").unwrap();
    let yes = yes.answer.as_ref().unwrap();
    assert_eq!(yes.text.as_deref(), Some("Yes"));
    assert_eq!(yes.raw, "2");

    let no = layout.edge_between("ask", "end").unwrap();
    assert_eq!(no.answer.as_ref().unwrap().text.as_deref(), Some("No"));

    let plain = layout.edge_between("advice", "end").unwrap();
    assert!(plain.answer.is_none());
}

#[test]
fn loops_fixture_terminates_every_cycle() {
    let layout = layout_fixture("loops.json");
    assert_eq!(
        ids(&layout),
        ["start", "ask", "start", "done", "again", "ask", "end"]
    );
    assert_eq!(layout.loop_count(), 2);
    for slot in layout.slots.iter().filter(|slot| slot.is_loop) {
        assert!(slot.children.is_empty(), "loop slot {} has children", slot.id);
        assert_eq!(slot.subtree_width, 1);
    }
    let end = layout.slots_for("end").next().unwrap();
    assert!(!end.is_loop);
}

#[test]
fn shared_fixture_repeats_descendants_per_path() {
    let layout = layout_fixture("shared.json");
    assert_eq!(layout.slots_for("join").count(), 2);
    assert_eq!(layout.slots_for("end").count(), 4);
    assert_eq!(layout.loop_count(), 0);
    assert_eq!(layout.root_width, 4);

    let joins: Vec<_> = layout.slots_for("join").collect();
    assert_eq!(joins[0].subtree_width, 2);
    assert!(joins[1].bounds.x > joins[0].bounds.x);

    let answers: Vec<_> = layout
        .edges
        .iter()
        .filter(|edge| edge.from == "join")
        .map(|edge| edge.answer.as_ref().and_then(|a| a.text.clone()))
        .collect();
    assert_eq!(
        answers,
        [
            Some("Left".to_string()),
            Some("Right".to_string()),
            Some("Left".to_string()),
            Some("Right".to_string()),
        ]
    );
}

#[test]
fn siblings_never_overlap() {
    for rel in ["choice.json", "loops.json", "shared.json"] {
        let layout = layout_fixture(rel);
        for slot in &layout.slots {
            let mut children: Vec<_> = slot.children.iter().map(|&i| &layout.slots[i]).collect();
            children.sort_by(|a, b| a.bounds.x.total_cmp(&b.bounds.x));
            for pair in children.windows(2) {
                assert!(
                    pair[0].center().0 < pair[1].center().0,
                    "{rel}: children of {} overlap",
                    slot.id
                );
            }
        }
    }
}

#[test]
fn children_sit_below_their_ancestor() {
    let layout = layout_fixture("shared.json");
    for slot in layout.slots.iter().skip(1) {
        let ancestor = &layout.slots[slot.ancestor.unwrap()];
        assert!(slot.bounds.y > ancestor.bounds.bottom(), "{}", slot.id);
        assert_eq!(slot.depth, ancestor.depth + 1);
    }
}

#[test]
fn json5_input_is_accepted() {
    let layout = layout_fixture("commented.json5");
    assert_eq!(ids(&layout), ["start", "end"]);
    assert_eq!(layout.root().unwrap().text.as_deref(), Some("Hello"));
}

#[test]
fn deep_chain_hits_depth_limit() {
    let mut flow = String::from(r#"{"flow": {"start": {"type": "InstructionStanza", "next": ["n0"]}"#);
    for i in 0..80 {
        flow.push_str(&format!(
            r#", "n{i}": {{"type": "InstructionStanza", "next": ["n{}"]}}"#,
            i + 1
        ));
    }
    flow.push_str(r#", "n80": {"type": "EndStanza"}}}"#);
    let doc = parse_process_with(&flow, InputSyntax::Json).unwrap();
    let err = compute_layout(&doc, &Theme::classic(), &layout_config()).unwrap_err();
    assert!(matches!(err, LayoutError::DepthLimitExceeded { limit: 50, .. }));
}

#[test]
fn svg_marks_loops_and_answers() {
    let layout = layout_fixture("loops.json");
    let svg = render_svg(&layout, &Theme::classic(), &RenderConfig::default()).unwrap();
    assert_eq!(svg.matches("label Instruction id-start loop").count(), 1);
    assert!(svg.contains(">Retry<"));
    assert!(svg.contains(">Exit<"));
    assert!(svg.contains("data-parent=\"again\""));
}

#[test]
fn fixtures_fit_inside_canvas() {
    for rel in ["choice.json", "loops.json", "shared.json", "commented.json5"] {
        let layout = layout_fixture(rel);
        let (x, y) = layout.view_origin;
        let areas = layout
            .slots
            .iter()
            .map(|slot| slot.bounds)
            .chain(layout.edges.iter().filter_map(|edge| edge.answer.as_ref()?.bounds()));
        for area in areas {
            assert!(area.x >= x && area.y >= y, "{rel}: {area:?} starts off canvas");
            assert!(area.right() <= x + layout.width, "{rel}: {area:?} past right edge");
            assert!(area.bottom() <= y + layout.height, "{rel}: {area:?} past bottom edge");
        }
    }
}
