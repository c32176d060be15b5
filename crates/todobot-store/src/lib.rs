//! Task store for Todobot.
//!
//! # Architecture
//!
//! - [`traits::TaskStore`]: the narrow interface the agent's tools consume
//! - [`sqlite::SqliteTaskStore`]: `sqlx`-backed implementation
//! - [`task::Task`]: the persisted record
//! - [`error::StoreError`]: every failure the store can report

pub mod error;
pub mod sqlite;
pub mod task;
pub mod traits;

// Re-export main types for convenience
pub use error::StoreError;
pub use sqlite::SqliteTaskStore;
pub use task::Task;
pub use traits::TaskStore;
