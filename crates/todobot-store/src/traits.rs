//! Task store trait: the interface the agent's tools are written against.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::task::Task;

/// Durable record of tasks.
///
/// Implementations are only ever called sequentially by the agent loop, but
/// must be `Send + Sync` so they can live behind an `Arc`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task, oldest first.
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Insert a task and return its new identifier.
    async fn create(&self, text: &str) -> Result<i64, StoreError>;

    /// Tasks whose text contains `query`, case-insensitively, oldest first.
    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError>;

    /// Delete by identifier. Returns `false` (not an error) if nothing matched.
    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
