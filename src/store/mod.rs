//! Query store implementations
//!
//! - `config.rs` - connection settings for the SQLite pool
//! - `sqlite.rs` - `QueryStore` over a `sqlx` SQLite pool

pub mod config;
pub mod sqlite;

pub use config::{MEMORY_PATH, StoreConfig};
pub use sqlite::SqliteStore;
