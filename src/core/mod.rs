pub mod error;
pub mod path;
pub mod types;

pub use error::{BatchError, BatchResult, StoreError, StoreResult};
pub use path::{Path, PathSegment};
pub use types::{
    DISCRIMINATOR_KEY, DISCRIMINATOR_TAG, ExecutedQuery, LocatedQuery, QueryMarker, QueryMode,
    QueryOutcome,
};
