//! Subject Row
//!
//! A subject is the tenant boundary for the taxonomy: every category and
//! topic is transitively scoped to exactly one `(owner_id, subject_id)`
//! pair, and every read/write path re-checks that scope explicitly rather
//! than trusting a supplied id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject row as persisted in the `subjects` table.
///
/// Subject CRUD itself lives outside this core; the synchronization layer
/// only needs the ownership lookup (`exists`, `owner_id`, `deleted_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique identifier (UUID)
    pub id: String,

    /// Owning user
    pub owner_id: String,

    /// Display name
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Soft-delete marker; `Some` means the subject is invisible to reads
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// Create a new Subject with an auto-generated UUID
    pub fn new(owner_id: String, name: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name,
            created_at: now,
            modified_at: now,
            deleted_at: None,
        }
    }
}
