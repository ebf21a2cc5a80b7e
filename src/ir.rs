use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const START_ID: &str = "start";
pub const END_ID: &str = "end";

const ROLE_SUFFIX: &str = "Stanza";

/// Reference to display text: either a key into the phrase table or the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextRef {
    Phrase(u64),
    Inline(String),
}

impl TextRef {
    /// The raw value as written in the document, used for `data-text` attributes.
    pub fn raw(&self) -> Cow<'_, str> {
        match self {
            TextRef::Phrase(id) => Cow::Owned(id.to_string()),
            TextRef::Inline(text) => Cow::Borrowed(text.as_str()),
        }
    }

    pub fn resolve<'a>(&'a self, phrases: &'a PhraseTable) -> Option<&'a str> {
        match self {
            TextRef::Phrase(id) => phrases.lookup(&id.to_string()),
            TextRef::Inline(text) => Some(text.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextRef>,
    #[serde(default)]
    pub next: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<TextRef>>,
}

impl ProcessNode {
    pub fn implicit_end() -> Self {
        Self {
            kind: format!("End{ROLE_SUFFIX}"),
            text: None,
            next: Vec::new(),
            answers: None,
        }
    }

    /// Stanza type without its `Stanza` suffix, e.g. `ChoiceStanza` -> `Choice`.
    pub fn role(&self) -> &str {
        let role = self.kind.strip_suffix(ROLE_SUFFIX).unwrap_or(&self.kind);
        if role.is_empty() { &self.kind } else { role }
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_empty()
    }

    pub fn answer_for(&self, branch: usize) -> Option<&TextRef> {
        self.answers.as_ref().and_then(|answers| answers.get(branch))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Phrase {
    Single(String),
    Variants(Vec<String>),
}

impl Phrase {
    pub fn canonical(&self) -> Option<&str> {
        match self {
            Phrase::Single(text) => Some(text.as_str()),
            Phrase::Variants(variants) => variants.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseTable {
    phrases: BTreeMap<String, Phrase>,
}

impl PhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, phrase: Phrase) {
        self.phrases.insert(id.into(), phrase);
    }

    /// Canonical text for a phrase id, or `None` when the id is unknown.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.phrases.get(id).and_then(Phrase::canonical)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl FromIterator<(String, Phrase)> for PhraseTable {
    fn from_iter<I: IntoIterator<Item = (String, Phrase)>>(iter: I) -> Self {
        Self {
            phrases: iter.into_iter().collect(),
        }
    }
}

/// A process definition keyed by node id, kept in document order.
#[derive(Debug, Clone, Default)]
pub struct ProcessGraph {
    pub nodes: IndexMap<String, ProcessNode>,
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, node: ProcessNode) {
        self.nodes.insert(id.into(), node);
    }

    pub fn get(&self, id: &str) -> Option<&ProcessNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn successors(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|node| node.next.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A loaded process document: the flow graph plus its phrase table.
#[derive(Debug, Clone, Default)]
pub struct ProcessDocument {
    pub graph: ProcessGraph,
    pub phrases: PhraseTable,
}

impl ProcessDocument {
    /// Display text of `node`; inline text borrows from the node, phrase
    /// references from the document's table.
    pub fn node_text<'a>(&'a self, node: &'a ProcessNode) -> Option<&'a str> {
        node.text.as_ref().and_then(|text| text.resolve(&self.phrases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strips_stanza_suffix() {
        let node = ProcessNode {
            kind: "ChoiceStanza".to_string(),
            text: None,
            next: Vec::new(),
            answers: None,
        };
        assert_eq!(node.role(), "Choice");
        assert_eq!(ProcessNode::implicit_end().role(), "End");
    }

    #[test]
    fn bare_suffix_keeps_full_type() {
        let node = ProcessNode {
            kind: "Stanza".to_string(),
            text: None,
            next: Vec::new(),
            answers: None,
        };
        assert_eq!(node.role(), "Stanza");
    }

    #[test]
    fn phrase_lookup_uses_first_variant() {
        let mut phrases = PhraseTable::new();
        phrases.insert("0", Phrase::Single("Hello".to_string()));
        phrases.insert(
            "1",
            Phrase::Variants(vec!["Yes".to_string(), "Yes, I do".to_string()]),
        );
        assert_eq!(phrases.lookup("0"), Some("Hello"));
        assert_eq!(phrases.lookup("1"), Some("Yes"));
    }

    #[test]
    fn phrase_lookup_miss_is_none() {
        let phrases = PhraseTable::new();
        assert_eq!(phrases.lookup("42"), None);
        assert_eq!(TextRef::Phrase(42).resolve(&phrases), None);
        assert_eq!(
            TextRef::Inline("inline".to_string()).resolve(&phrases),
            Some("inline")
        );
    }

    #[test]
    fn node_text_resolves_detached_nodes() {
        let mut doc = ProcessDocument::default();
        doc.phrases.insert("3", Phrase::Single("From table".to_string()));
        let inline = ProcessNode {
            kind: "InstructionStanza".to_string(),
            text: Some(TextRef::Inline("Inline".to_string())),
            next: Vec::new(),
            answers: None,
        };
        let referenced = ProcessNode {
            text: Some(TextRef::Phrase(3)),
            ..inline.clone()
        };
        let end = ProcessNode::implicit_end();
        let texts: Vec<Option<&str>> = [&inline, &referenced, &end]
            .into_iter()
            .map(|node| doc.node_text(node))
            .collect();
        assert_eq!(texts, vec![Some("Inline"), Some("From table"), None]);
    }
}
