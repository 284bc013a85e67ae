//! Category Row
//!
//! Categories form the two upper levels of the taxonomy. A depth-1 row is a
//! top-level category (`parent_id = None`); a depth-2 row is a subcategory
//! whose `parent_id` references a depth-1 row in the same subject and owner.
//! Topics attach only to depth-2 rows.
//!
//! # Examples
//!
//! ```rust
//! use studymap_core::models::Category;
//!
//! let root = Category::new_root(
//!     "cat-1".to_string(),
//!     "user-1".to_string(),
//!     "subject-1".to_string(),
//!     "Accounting".to_string(),
//!     0,
//! );
//! assert_eq!(root.depth, 1);
//! assert!(root.parent_id.is_none());
//!
//! let sub = Category::new_child(
//!     "cat-2".to_string(),
//!     "user-1".to_string(),
//!     "subject-1".to_string(),
//!     "Bookkeeping".to_string(),
//!     root.id.clone(),
//!     0,
//! );
//! assert_eq!(sub.depth, 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category row as persisted in the `categories` table.
///
/// `depth` is always 1 or 2 and `parent_id` is `None` iff `depth == 1`.
/// Both values are recomputed from tree position on every synchronization;
/// an id is a continuity token, never an authority on placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (UUID)
    pub id: String,

    /// Owning user
    pub owner_id: String,

    /// Subject this category belongs to
    pub subject_id: String,

    /// Display name
    pub name: String,

    /// Hierarchy depth: 1 = category, 2 = subcategory
    pub depth: i64,

    /// Parent category id (`None` iff depth 1)
    pub parent_id: Option<String>,

    /// Sibling-scoped sort key; not required unique
    pub display_order: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Create a depth-1 (top-level) category row
    pub fn new_root(
        id: String,
        owner_id: String,
        subject_id: String,
        name: String,
        display_order: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id,
            subject_id,
            name,
            depth: 1,
            parent_id: None,
            display_order,
            created_at: now,
            modified_at: now,
            deleted_at: None,
        }
    }

    /// Create a depth-2 (subcategory) row under `parent_id`
    pub fn new_child(
        id: String,
        owner_id: String,
        subject_id: String,
        name: String,
        parent_id: String,
        display_order: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id,
            subject_id,
            name,
            depth: 2,
            parent_id: Some(parent_id),
            display_order,
            created_at: now,
            modified_at: now,
            deleted_at: None,
        }
    }
}
