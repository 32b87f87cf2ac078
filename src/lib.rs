// ============================================================================
// embedql Library
// ============================================================================

pub mod batch;
pub mod cli;
pub mod config;
pub mod core;
pub mod interface;
pub mod store;
pub mod web;

// Re-export main types for convenience
pub use batch::{Locator, execute, locate, resolve_document, splice};
pub use config::ServerConfig;
pub use self::core::{
    BatchError, BatchResult, ExecutedQuery, LocatedQuery, Path, PathSegment, QueryMarker,
    QueryMode, QueryOutcome, StoreError, StoreResult,
};
pub use interface::QueryStore;
pub use store::{SqliteStore, StoreConfig};
