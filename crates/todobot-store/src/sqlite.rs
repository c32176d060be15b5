//! SQLite task store.
//!
//! Uses an `sqlx` connection pool with WAL mode for file databases. The
//! schema lives in `migrations/` and is applied on every connect; the
//! statements are idempotent. All queries are parameterized.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::{ConnectOptions, Row};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::task::Task;
use crate::traits::TaskStore;

/// Schema for the `todos` table.
const MIGRATION_001: &str = include_str!("../migrations/001_todos.sql");

const LIST_SQL: &str = "SELECT id, todo, created_at, updated_at FROM todos ORDER BY id";

/// [`TaskStore`] backed by a SQLite database.
pub struct SqliteTaskStore {
    pool: SqlitePool,
    in_memory: bool,
}

impl SqliteTaskStore {
    /// Open (creating if missing) the database at `database_url` and apply
    /// the schema.
    ///
    /// Accepts any sqlx SQLite URL: `sqlite://todos.db`, `sqlite::memory:`, ...
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let in_memory = is_in_memory(database_url);
        info!(in_memory, "Connecting to task store");

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .disable_statement_logging();
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // An in-memory database lives exactly as long as its connection.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        debug!("Task store connection established");

        let store = Self { pool, in_memory };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create the schema if it doesn't exist.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(MIGRATION_001)
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Migration {
                name: "001_todos.sql",
                source,
            })?;

        debug!("Task store migrations applied");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checkpoint the WAL and close every connection.
    pub async fn close(self) -> Result<(), StoreError> {
        if !self.in_memory {
            sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
                .execute(&self.pool)
                .await?;
        }
        self.pool.close().await;
        info!("Task store closed");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(LIST_SQL)
            .fetch_all(&self.pool)
            .await?;

        rows_to_tasks(&rows)
    }

    async fn create(&self, text: &str) -> Result<i64, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyTask);
        }

        let now = Utc::now();
        let result = sqlx::query("INSERT INTO todos (todo, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(text)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Created task");
        Ok(id)
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        // SQLite's LIKE and lower() fold ASCII only, so match here.
        let needle = query.to_lowercase();
        let rows = sqlx::query(LIST_SQL)
            .fetch_all(&self.pool)
            .await?;

        let found: Vec<Task> = rows_to_tasks(&rows)?
            .into_iter()
            .filter(|task| task.todo.to_lowercase().contains(&needle))
            .collect();
        debug!(matches = found.len(), "Searched tasks");
        Ok(found)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(id, deleted, "Delete task");
        Ok(deleted)
    }
}

fn rows_to_tasks(rows: &[SqliteRow]) -> Result<Vec<Task>, StoreError> {
    rows.iter()
        .map(|row| -> Result<Task, StoreError> {
            Ok(Task {
                id: row.try_get("id")?,
                todo: row.try_get("todo")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            })
        })
        .collect()
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
