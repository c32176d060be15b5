//! Store error type.

use thiserror::Error;

/// Errors raised by a [`TaskStore`](crate::TaskStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, constraint, or query failure from the database.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The schema could not be created.
    #[error("failed to run migration {name}: {source}")]
    Migration {
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A task body was empty or whitespace-only.
    #[error("task text must not be empty")]
    EmptyTask,
}
