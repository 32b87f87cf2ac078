use super::Path;
use thiserror::Error;

/// Structural and validation errors raised while locating queries.
///
/// Any of these aborts the whole request before a single statement runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Object at path \"{path}\" is not valid: {reason}")]
    MalformedNode { path: Path, reason: String },

    #[error("Query at path \"{path}\" is not valid: {detail}")]
    InvalidQuery { path: Path, detail: String },
}

impl BatchError {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn invalid_query(path: &Path, detail: impl Into<String>) -> Self {
        Self::InvalidQuery {
            path: path.clone(),
            detail: detail.into(),
        }
    }

    /// Location inside the submitted document where validation failed
    pub fn path(&self) -> &Path {
        match self {
            Self::MalformedNode { path, .. } | Self::InvalidQuery { path, .. } => path,
        }
    }
}

pub type BatchResult<T> = std::result::Result<T, BatchError>;

/// Errors reported by a query store for a single statement.
///
/// These never escape the executor: each one is folded into the failure
/// outcome of the query that caused it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),

    #[error("Unsupported parameter at position {index}: {reason}")]
    UnsupportedParam { index: usize, reason: String },

    #[error("Cannot decode column '{column}': {reason}")]
    Decode { column: String, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
