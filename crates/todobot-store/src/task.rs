//! Task record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted to-do item.
///
/// Serialised camelCase (`id`, `todo`, `createdAt`, `updatedAt`); this is the
/// shape the model sees inside observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub todo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
