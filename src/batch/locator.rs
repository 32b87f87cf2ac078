//! Query Locator
//!
//! Walks a document depth-first, pre-order, and collects every query marker
//! together with its path. Arrays are visited in index order, objects in the
//! map's key order. A tagged object is terminal: its fields are validated,
//! never scanned for further markers.

use serde_json::{Map, Value};

use crate::core::{BatchError, BatchResult, LocatedQuery, Path, QueryMarker};

/// Containers nested deeper than this are rejected
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Shape of a single document node, decided by one discriminator check
enum Node<'a> {
    Leaf,
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Query(&'a Map<String, Value>),
}

impl<'a> Node<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Node::Leaf,
            Value::Array(items) => Node::Sequence(items),
            Value::Object(object) if QueryMarker::is_tagged(object) => Node::Query(object),
            Value::Object(object) => Node::Mapping(object),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    max_depth: usize,
}

impl Locator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the deepest path at which a container may still appear
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    /// Find and validate every marker in `document`.
    ///
    /// Fails on the first invalid marker or malformed node, in traversal
    /// order, so a bad document never yields a partial batch.
    pub fn locate(&self, document: &Value) -> BatchResult<Vec<LocatedQuery>> {
        let mut found = Vec::new();
        self.visit(document, Path::root(), &mut found)?;
        Ok(found)
    }

    fn visit(&self, value: &Value, path: Path, found: &mut Vec<LocatedQuery>) -> BatchResult<()> {
        match Node::classify(value) {
            Node::Leaf => Ok(()),
            Node::Query(object) => {
                let marker = QueryMarker::from_object(object)
                    .map_err(|detail| BatchError::invalid_query(&path, detail))?;
                found.push(LocatedQuery { path, marker });
                Ok(())
            }
            Node::Sequence(items) => {
                self.check_depth(&path)?;
                for (index, item) in items.iter().enumerate() {
                    self.visit(item, path.child(index), found)?;
                }
                Ok(())
            }
            Node::Mapping(object) => {
                self.check_depth(&path)?;
                for (key, item) in object {
                    self.visit(item, path.child(key.as_str()), found)?;
                }
                Ok(())
            }
        }
    }

    fn check_depth(&self, path: &Path) -> BatchResult<()> {
        if path.depth() >= self.max_depth {
            return Err(BatchError::malformed(
                path,
                format!("nesting exceeds the maximum depth of {}", self.max_depth),
            ));
        }
        Ok(())
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Locator::locate`] with the default depth limit
pub fn locate(document: &Value) -> BatchResult<Vec<LocatedQuery>> {
    Locator::new().locate(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PathSegment, QueryMode};
    use serde_json::json;

    fn paths(found: &[LocatedQuery]) -> Vec<String> {
        found.iter().map(|q| q.path.to_string()).collect()
    }

    fn query(statement: &str) -> Value {
        json!({"_type": "query", "mode": "get", "query": statement})
    }

    #[test]
    fn test_document_without_markers() {
        let doc = json!({"a": [1, "two", null, true, 3.5], "b": {"c": {}}});
        assert!(locate(&doc).unwrap().is_empty());
        assert!(locate(&json!(null)).unwrap().is_empty());
        assert!(locate(&json!(false)).unwrap().is_empty());
    }

    #[test]
    fn test_preorder_index_then_key() {
        let doc = json!({
            "b": [query("b0"), {"inner": query("b1")}],
            "a": query("a"),
            "c": {"z": query("cz"), "m": [[query("cm00")]]}
        });

        let found = locate(&doc).unwrap();
        assert_eq!(paths(&found), vec!["a", "b.0", "b.1.inner", "c.m.0.0", "c.z"]);
        assert_eq!(found[0].marker.statement, "a");
        assert_eq!(found[3].marker.statement, "cm00");
    }

    #[test]
    fn test_path_segments_are_typed() {
        let found = locate(&json!({"list": [1, query("q")]})).unwrap();
        assert_eq!(
            found[0].path.segments(),
            &[PathSegment::key("list"), PathSegment::Index(1)]
        );
    }

    #[test]
    fn test_repeatable() {
        let doc = json!({"x": {"y": query("1"), "z": query("2")}, "w": [query("3")]});
        let first = locate(&doc).unwrap();
        for _ in 0..10 {
            assert_eq!(locate(&doc).unwrap(), first);
        }
    }

    #[test]
    fn test_bare_marker_at_root() {
        let found = locate(&query("SELECT 1")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].path.is_root());
    }

    #[test]
    fn test_marker_contents_are_not_scanned() {
        let doc = json!({
            "outer": {
                "_type": "query",
                "mode": "all",
                "query": "SELECT ?",
                "params": [query("nested"), {"deep": query("nested")}]
            }
        });

        let found = locate(&doc).unwrap();
        assert_eq!(paths(&found), vec!["outer"]);
        assert_eq!(found[0].marker.mode, QueryMode::All);
        assert_eq!(found[0].marker.params.len(), 2);
    }

    #[test]
    fn test_other_tag_values_are_plain_objects() {
        let doc = json!({"a": {"_type": "note", "b": query("q")}});
        assert_eq!(paths(&locate(&doc).unwrap()), vec!["a.b"]);
    }

    #[test]
    fn test_invalid_marker_aborts() {
        let doc = json!({
            "good": query("SELECT 1"),
            "bad": {"_type": "query", "mode": "nope", "query": "x"}
        });

        match locate(&doc).unwrap_err() {
            BatchError::InvalidQuery { path, detail } => {
                assert_eq!(path.to_string(), "bad");
                assert!(detail.contains("nope"), "{detail}");
            }
            other => panic!("expected InvalidQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let doc = json!({"a": {"b": {"c": [query("too deep")]}}});

        let err = Locator::new().max_depth(3).locate(&doc).unwrap_err();
        match err {
            BatchError::MalformedNode { path, .. } => assert_eq!(path.to_string(), "a.b.c"),
            other => panic!("expected MalformedNode, got {other:?}"),
        }

        assert_eq!(Locator::new().max_depth(4).locate(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_located_paths_never_overlap() {
        let doc = json!({
            "x": {"y": query("1"), "z": [query("2"), {"k": query("3")}]},
            "root": query("4")
        });
        let found = locate(&doc).unwrap();

        for (i, a) in found.iter().enumerate() {
            for (j, b) in found.iter().enumerate() {
                if i != j {
                    assert!(!a.path.is_prefix_of(&b.path), "{} overlaps {}", a.path, b.path);
                }
            }
        }
    }
}
