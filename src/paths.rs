//! Enumeration of simple paths through a process flow.
//!
//! Useful for checking which decision sequences lead to a given stanza
//! before looking at the rendered tree.

use crate::ir::{END_ID, ProcessGraph};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("node \"{id}\" is not defined in the process flow")]
    UnknownNode { id: String },
}

/// Every path from `from` to `to` that visits no node twice, in the order
/// successors appear in each node's `next` list.
pub fn simple_paths(graph: &ProcessGraph, from: &str, to: &str) -> Result<Vec<Vec<String>>, PathError> {
    if !graph.contains(from) && from != END_ID {
        return Err(PathError::UnknownNode {
            id: from.to_string(),
        });
    }
    if !graph.contains(to) && to != END_ID {
        return Err(PathError::UnknownNode { id: to.to_string() });
    }
    let mut search = PathSearch {
        graph,
        target: to,
        on_path: HashSet::new(),
        path: Vec::new(),
        found: Vec::new(),
    };
    search.visit(from);
    log::debug!("found {} paths from \"{from}\" to \"{to}\"", search.found.len());
    Ok(search.found)
}

struct PathSearch<'a> {
    graph: &'a ProcessGraph,
    target: &'a str,
    on_path: HashSet<&'a str>,
    path: Vec<&'a str>,
    found: Vec<Vec<String>>,
}

impl<'a> PathSearch<'a> {
    fn visit(&mut self, id: &'a str) {
        self.on_path.insert(id);
        self.path.push(id);
        if id == self.target {
            self.found
                .push(self.path.iter().map(|step| step.to_string()).collect());
        } else {
            let graph = self.graph;
            for next in graph.successors(id) {
                if !self.on_path.contains(next.as_str()) {
                    self.visit(next);
                }
            }
        }
        self.path.pop();
        self.on_path.remove(id);
    }
}

pub fn format_path(path: &[String]) -> String {
    path.join(" -> ")
}
