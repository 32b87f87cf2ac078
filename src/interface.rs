use async_trait::async_trait;
use serde_json::Value;

use crate::core::StoreResult;

/// The execution capability queries are run against.
///
/// The batch executor only ever calls these two methods, one per query mode.
/// Statements are opaque: implementations receive them verbatim and bind
/// `params` positionally. Timeouts, retries, and writer serialization are
/// the implementation's business.
///
/// `SqliteStore` is the production implementation; tests wrap a scripted
/// map of statements to results.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Fetch at most one record; `None` when nothing matched.
    async fn fetch_one(&self, statement: &str, params: &[Value]) -> StoreResult<Option<Value>>;

    /// Fetch every matching record, in the order the store yields them.
    async fn fetch_all(&self, statement: &str, params: &[Value]) -> StoreResult<Vec<Value>>;
}
