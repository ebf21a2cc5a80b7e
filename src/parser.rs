use crate::ir::{END_ID, Phrase, PhraseTable, ProcessDocument, ProcessGraph, ProcessNode, START_ID};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5: {0}")]
    Json5(#[from] json5::Error),
    #[error("process flow has no \"{START_ID}\" node")]
    MissingStart,
    #[error("node \"{node}\" references unknown successor \"{target}\"")]
    DanglingSuccessor { node: String, target: String },
    #[error("node \"{node}\" has {answers} answers for {next} successors")]
    AnswerCountMismatch {
        node: String,
        answers: usize,
        next: usize,
    },
    #[error("phrase \"{id}\" has no variants")]
    EmptyPhrase { id: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputSyntax {
    #[default]
    Json,
    Json5,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    flow: IndexMap<String, ProcessNode>,
    #[serde(default)]
    phrases: Option<RawPhrases>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPhrases {
    Keyed(BTreeMap<String, Phrase>),
    Indexed(Vec<Phrase>),
}

impl RawPhrases {
    fn into_table(self) -> Result<PhraseTable, ParseError> {
        let entries: Vec<(String, Phrase)> = match self {
            RawPhrases::Keyed(map) => map.into_iter().collect(),
            RawPhrases::Indexed(list) => list
                .into_iter()
                .enumerate()
                .map(|(idx, phrase)| (idx.to_string(), phrase))
                .collect(),
        };
        if let Some((id, _)) = entries.iter().find(|(_, phrase)| phrase.canonical().is_none()) {
            return Err(ParseError::EmptyPhrase { id: id.clone() });
        }
        Ok(entries.into_iter().collect())
    }
}

pub fn parse_process(input: &str) -> Result<ProcessDocument, ParseError> {
    parse_process_with(input, InputSyntax::Json)
}

pub fn parse_process_with(input: &str, syntax: InputSyntax) -> Result<ProcessDocument, ParseError> {
    let raw: RawDocument = match syntax {
        InputSyntax::Json => serde_json::from_str(input)?,
        InputSyntax::Json5 => json5::from_str(input)?,
    };
    let phrases = match raw.phrases {
        Some(phrases) => phrases.into_table()?,
        None => PhraseTable::new(),
    };
    let graph = ProcessGraph { nodes: raw.flow };
    validate_graph(&graph)?;
    log::debug!(
        "loaded process with {} nodes and {} phrases",
        graph.len(),
        phrases.len()
    );
    Ok(ProcessDocument { graph, phrases })
}

/// Checks the invariants the layout relies on: a start node, resolvable
/// successors, and one answer per successor on choice nodes.
pub fn validate_graph(graph: &ProcessGraph) -> Result<(), ParseError> {
    if !graph.contains(START_ID) {
        return Err(ParseError::MissingStart);
    }
    for (id, node) in &graph.nodes {
        if let Some(target) = node
            .next
            .iter()
            .find(|target| target.as_str() != END_ID && !graph.contains(target))
        {
            return Err(ParseError::DanglingSuccessor {
                node: id.clone(),
                target: target.clone(),
            });
        }
        if let Some(answers) = &node.answers
            && answers.len() != node.next.len()
        {
            return Err(ParseError::AnswerCountMismatch {
                node: id.clone(),
                answers: answers.len(),
                next: node.next.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TextRef;

    #[test]
    fn parse_simple_process() {
        let input = r#"{
            "flow": {
                "start": {"type": "ChoiceStanza", "text": 0, "next": ["a", "end"], "answers": [1, 2]},
                "a": {"type": "EndStanza", "text": "Done"}
            },
            "phrases": {"0": "Continue?", "1": ["Yes", "Yes please"], "2": "No"}
        }"#;
        let doc = parse_process(input).unwrap();
        assert_eq!(doc.graph.len(), 2);
        let start = doc.graph.get("start").unwrap();
        assert_eq!(start.next, vec!["a", "end"]);
        assert_eq!(start.answers.as_ref().unwrap()[0], TextRef::Phrase(1));
        assert_eq!(doc.node_text(start), Some("Continue?"));
        assert_eq!(doc.phrases.lookup("1"), Some("Yes"));
        let a = doc.graph.get("a").unwrap();
        assert!(a.is_terminal());
        assert_eq!(doc.node_text(a), Some("Done"));
    }

    #[test]
    fn flow_keeps_document_order() {
        let input = r#"{"flow": {
            "start": {"type": "InstructionStanza", "text": 0, "next": ["z"]},
            "z": {"type": "InstructionStanza", "text": 0, "next": ["b"]},
            "b": {"type": "EndStanza", "text": 0}
        }}"#;
        let doc = parse_process(input).unwrap();
        let ids: Vec<&str> = doc.graph.nodes.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["start", "z", "b"]);
    }

    #[test]
    fn indexed_phrases_use_positions() {
        let input = r#"{"flow": {"start": {"type": "EndStanza", "text": 1}},
            "phrases": ["zero", ["one", "uno"]]}"#;
        let doc = parse_process(input).unwrap();
        assert_eq!(doc.phrases.lookup("1"), Some("one"));
        assert_eq!(doc.node_text(doc.graph.get("start").unwrap()), Some("one"));
    }

    #[test]
    fn missing_start_is_rejected() {
        let input = r#"{"flow": {"a": {"type": "EndStanza", "text": 0}}}"#;
        assert!(matches!(parse_process(input), Err(ParseError::MissingStart)));
    }

    #[test]
    fn dangling_successor_is_rejected() {
        let input = r#"{"flow": {"start": {"type": "InstructionStanza", "text": 0, "next": ["ghost"]}}}"#;
        let err = parse_process(input).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DanglingSuccessor { ref node, ref target } if node == "start" && target == "ghost"
        ));
    }

    #[test]
    fn implicit_end_is_a_valid_successor() {
        let input = r#"{"flow": {"start": {"type": "InstructionStanza", "text": 0, "next": ["end"]}}}"#;
        assert!(parse_process(input).is_ok());
    }

    #[test]
    fn answer_count_must_match_successors() {
        let input = r#"{"flow": {
            "start": {"type": "ChoiceStanza", "text": 0, "next": ["end"], "answers": ["Yes", "No"]}
        }}"#;
        assert!(matches!(
            parse_process(input),
            Err(ParseError::AnswerCountMismatch { answers: 2, next: 1, .. })
        ));
    }

    #[test]
    fn empty_phrase_variants_are_rejected() {
        let input = r#"{"flow": {"start": {"type": "EndStanza", "text": 0}}, "phrases": {"0": []}}"#;
        assert!(matches!(parse_process(input), Err(ParseError::EmptyPhrase { .. })));
    }

    #[test]
    fn json5_syntax_accepts_comments_and_trailing_commas() {
        let input = r#"{
            // entry point
            flow: {
                start: {type: "EndStanza", text: "Bye",},
            },
        }"#;
        let doc = parse_process_with(input, InputSyntax::Json5).unwrap();
        assert!(doc.graph.contains("start"));
    }
}
