//! Batched query resolution
//!
//! A request document flows through three stages:
//!
//! - `locator.rs` - find and validate every embedded query marker
//! - `executor.rs` - run the located queries concurrently against a store
//! - `splicer.rs` - rebuild the document with outcomes in place of markers
//!
//! Validation finishes before anything runs, so an invalid marker anywhere
//! in the document means no statement is executed at all.

pub mod executor;
pub mod locator;
pub mod splicer;

pub use executor::execute;
pub use locator::{DEFAULT_MAX_DEPTH, Locator, locate};
pub use splicer::splice;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::BatchResult;
use crate::interface::QueryStore;

/// Locate, execute, and splice in one go.
///
/// Returns the result document, or the validation error that stopped the
/// batch before execution.
pub async fn resolve_document(
    document: &Value,
    store: &dyn QueryStore,
    locator: &Locator,
) -> BatchResult<Value> {
    let located = locator.locate(document)?;
    debug!(queries = located.len(), "located queries");

    if located.is_empty() {
        return Ok(document.clone());
    }

    let executed = execute(located, store).await;
    let failed = executed.iter().filter(|q| !q.outcome.is_success()).count();
    info!(queries = executed.len(), failed, "batch resolved");

    Ok(splice(document, &executed))
}
