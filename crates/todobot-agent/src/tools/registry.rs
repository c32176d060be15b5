//! Tool dispatch: runs a [`TodoTool`] against the task store.
//!
//! Every result is rendered as the JSON string the model sees in its
//! observation.

use std::sync::Arc;

use serde::Serialize;
use todobot_store::{StoreError, TaskStore};
use tracing::{debug, warn};

use super::TodoTool;

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Dispatches tool calls to a [`TaskStore`].
#[derive(Clone)]
pub struct ToolRegistry {
    store: Arc<dyn TaskStore>,
}

/// Observation payload for `deleteTodoById`.
#[derive(Debug, Serialize)]
struct DeleteResult {
    deleted: bool,
    id: i64,
}

impl ToolRegistry {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Execute a tool and serialise its result.
    ///
    /// - `getAllTodos` / `searchTodo` → JSON array of tasks
    /// - `createTodo` → the new id
    /// - `deleteTodoById` → `{"deleted": bool, "id": n}`
    pub async fn execute(&self, tool: &TodoTool) -> Result<String, StoreError> {
        let result = match tool {
            TodoTool::GetAllTodos => to_observation(&self.store.list_all().await?),
            TodoTool::CreateTodo { text } => to_observation(&self.store.create(text).await?),
            TodoTool::DeleteTodoById { id } => {
                let deleted = self.store.delete_by_id(*id).await?;
                to_observation(&DeleteResult { deleted, id: *id })
            }
            TodoTool::SearchTodo { query } => to_observation(&self.store.search(query).await?),
        };

        debug!(tool = tool.name(), result_len = result.len(), "tool result");
        Ok(result)
    }
}

fn to_observation<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialise tool result");
        format!("Error: failed to serialise tool result: {e}")
    })
}
