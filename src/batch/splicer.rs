//! Tree Splicer
//!
//! Produces the result document: a copy of the submitted document in which
//! every located marker is replaced by its outcome. The outcomes are first
//! folded into a path trie, then the document is rebuilt top-down. Only the
//! ancestors of replaced nodes are reconstructed; every other subtree is
//! carried over as is.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::core::{ExecutedQuery, PathSegment, QueryOutcome};

/// Pending edits below one node
enum Patch<'a> {
    Replace(&'a QueryOutcome),
    Descend(HashMap<&'a PathSegment, Patch<'a>>),
}

impl<'a> Patch<'a> {
    fn build(executed: &'a [ExecutedQuery]) -> Self {
        let mut root = Patch::Descend(HashMap::new());
        for query in executed {
            root.insert(query.path().segments(), &query.outcome);
        }
        root
    }

    fn insert(&mut self, segments: &'a [PathSegment], outcome: &'a QueryOutcome) {
        let Patch::Descend(children) = self else {
            debug_assert!(false, "query path nested below another query");
            return;
        };

        match segments.split_first() {
            None => {
                debug_assert!(children.is_empty(), "query path is an ancestor of another query");
                *self = Patch::Replace(outcome);
            }
            Some((head, rest)) => children
                .entry(head)
                .or_insert_with(|| Patch::Descend(HashMap::new()))
                .insert(rest, outcome),
        }
    }

    fn apply(&self, node: &Value) -> Value {
        let children = match self {
            Patch::Replace(outcome) => return outcome.to_value(),
            Patch::Descend(children) if children.is_empty() => return node.clone(),
            Patch::Descend(children) => children,
        };

        match node {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| match children.get(&PathSegment::Index(index)) {
                        Some(patch) => patch.apply(item),
                        None => item.clone(),
                    })
                    .collect(),
            ),
            Value::Object(object) => Value::Object(
                object
                    .iter()
                    .map(|(key, item)| {
                        let value = match children.get(&PathSegment::Key(key.clone())) {
                            Some(patch) => patch.apply(item),
                            None => item.clone(),
                        };
                        (key.clone(), value)
                    })
                    .collect::<Map<String, Value>>(),
            ),
            leaf => {
                debug_assert!(false, "query path descends into a leaf");
                leaf.clone()
            }
        }
    }
}

/// Build the result document. `document` is only read.
pub fn splice(document: &Value, executed: &[ExecutedQuery]) -> Value {
    Patch::build(executed).apply(document)
}
