//! Topic Row
//!
//! Topics are the leaves of the taxonomy. Each topic references a depth-2
//! category and carries the study metadata the client edits: description,
//! difficulty, topic type and an optional AI system prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic row as persisted in the `topics` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique identifier (UUID)
    pub id: String,

    /// Owning user
    pub owner_id: String,

    /// Depth-2 category this topic belongs to
    pub category_id: String,

    /// Display name
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Optional difficulty label
    pub difficulty: Option<String>,

    /// Optional topic type label
    pub topic_type: Option<String>,

    /// Optional system prompt used by AI features outside this core
    pub ai_system_prompt: Option<String>,

    /// Sibling-scoped sort key; not required unique
    pub display_order: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Topic {
    /// Create a topic row with only the required fields set
    pub fn new(
        id: String,
        owner_id: String,
        category_id: String,
        name: String,
        display_order: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id,
            category_id,
            name,
            description: None,
            difficulty: None,
            topic_type: None,
            ai_system_prompt: None,
            display_order,
            created_at: now,
            modified_at: now,
            deleted_at: None,
        }
    }
}
