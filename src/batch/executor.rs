use futures::future::join_all;
use serde_json::Value;
use tracing::warn;

use crate::core::{ExecutedQuery, LocatedQuery, QueryMode, QueryOutcome, StoreResult};
use crate::interface::QueryStore;

/// Run every located query concurrently and wait for all of them.
///
/// Outcomes come back in input order. A store error only affects the
/// outcome of the query that raised it.
pub async fn execute(located: Vec<LocatedQuery>, store: &dyn QueryStore) -> Vec<ExecutedQuery> {
    join_all(located.into_iter().map(|query| run_one(query, store))).await
}

async fn run_one(located: LocatedQuery, store: &dyn QueryStore) -> ExecutedQuery {
    let outcome = match dispatch(&located, store).await {
        Ok(data) => QueryOutcome::success(data),
        Err(err) => {
            warn!(path = %located.path, error = %err, "query failed");
            QueryOutcome::failure(err.to_string())
        }
    };

    ExecutedQuery { located, outcome }
}

async fn dispatch(located: &LocatedQuery, store: &dyn QueryStore) -> StoreResult<Value> {
    let marker = &located.marker;
    match marker.mode {
        QueryMode::Get => Ok(store
            .fetch_one(&marker.statement, &marker.params)
            .await?
            .unwrap_or(Value::Null)),
        QueryMode::All => Ok(Value::Array(
            store.fetch_all(&marker.statement, &marker.params).await?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Path, QueryMarker, StoreError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records calls; statements starting with "FAIL" error out
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(String, String, Vec<Value>)>>,
    }

    impl RecordingStore {
        fn record(&self, mode: &str, statement: &str, params: &[Value]) -> StoreResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((mode.to_string(), statement.to_string(), params.to_vec()));
            if statement.starts_with("FAIL") {
                return Err(StoreError::Backend(format!("rejected: {statement}")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QueryStore for RecordingStore {
        async fn fetch_one(&self, statement: &str, params: &[Value]) -> StoreResult<Option<Value>> {
            self.record("get", statement, params)?;
            if statement == "EMPTY" {
                return Ok(None);
            }
            Ok(Some(json!({"statement": statement})))
        }

        async fn fetch_all(&self, statement: &str, params: &[Value]) -> StoreResult<Vec<Value>> {
            self.record("all", statement, params)?;
            Ok(vec![json!(1), json!(2)])
        }
    }

    fn located(path: &str, mode: QueryMode, statement: &str) -> LocatedQuery {
        LocatedQuery {
            path: Path::root().child(path),
            marker: QueryMarker::new(mode, statement),
        }
    }

    #[tokio::test]
    async fn test_modes_dispatch_to_matching_store_call() {
        let store = RecordingStore::default();
        let batch = vec![
            located("one", QueryMode::Get, "SELECT one"),
            LocatedQuery {
                path: Path::root().child("many"),
                marker: QueryMarker::new(QueryMode::All, "SELECT many").with_params(vec![json!("p")]),
            },
            located("none", QueryMode::Get, "EMPTY"),
        ];

        let executed = execute(batch, &store).await;

        assert_eq!(executed.len(), 3);
        assert_eq!(
            executed[0].outcome,
            QueryOutcome::success(json!({"statement": "SELECT one"}))
        );
        assert_eq!(executed[1].outcome, QueryOutcome::success(json!([1, 2])));
        assert_eq!(executed[2].outcome, QueryOutcome::success(Value::Null));

        let calls = store.calls.lock().unwrap();
        assert!(calls.contains(&("all".to_string(), "SELECT many".to_string(), vec![json!("p")])));
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let store = RecordingStore::default();
        let batch = vec![
            located("a", QueryMode::Get, "SELECT a"),
            located("b", QueryMode::All, "FAIL b"),
            located("c", QueryMode::Get, "SELECT c"),
        ];

        let executed = execute(batch, &store).await;

        let paths: Vec<String> = executed.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
        assert!(executed[0].outcome.is_success());
        assert_eq!(executed[1].outcome, QueryOutcome::failure("rejected: FAIL b"));
        assert!(executed[2].outcome.is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let store = RecordingStore::default();
        assert!(execute(Vec::new(), &store).await.is_empty());
        assert!(store.calls.lock().unwrap().is_empty());
    }
}
