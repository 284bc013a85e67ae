//! Tree View and Request Types
//!
//! Wire-facing shapes for the two tree operations:
//!
//! - `SubjectTree` (and its nested levels) is what `get_subject_tree`
//!   returns: the assembled, display-order-sorted three-level hierarchy.
//! - `TreeUpdateRequest` is the full replacement tree a client submits to
//!   `update_subject_tree`. A node with `id: None` is new; a node with a
//!   persisted id that is omitted from the request is soft-deleted.
//!
//! Both sides serialize camelCase for the JS-facing caller.

use serde::{Deserialize, Serialize};

/// Fully assembled tree for one subject, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTree {
    /// Subject the tree belongs to
    pub subject_id: String,

    /// Top-level (depth-1) categories, ascending by display order
    pub categories: Vec<CategoryTree>,
}

/// Depth-1 category node in a served tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    pub id: String,
    pub name: String,
    pub display_order: i64,
    /// Depth-2 children, ascending by display order
    pub subcategories: Vec<SubcategoryTree>,
}

/// Depth-2 category node in a served tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryTree {
    pub id: String,
    pub name: String,
    pub display_order: i64,
    /// Topics attached to this subcategory, ascending by display order
    pub topics: Vec<TopicView>,
}

/// Topic leaf in a served tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub topic_type: Option<String>,
    pub ai_system_prompt: Option<String>,
    pub display_order: i64,
}

/// Full replacement tree submitted by a client.
///
/// The request is authoritative: depth and parent linkage are recomputed
/// from each node's position here, never trusted from an id's history, and
/// every persisted node absent from the request is soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeUpdateRequest {
    pub categories: Vec<CategoryInput>,
}

/// Top-level category in a replacement tree. `id: None` inserts a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub id: Option<String>,
    pub name: String,
    pub display_order: i64,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryInput>,
}

/// Subcategory in a replacement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryInput {
    pub id: Option<String>,
    pub name: String,
    pub display_order: i64,
    #[serde(default)]
    pub topics: Vec<TopicInput>,
}

/// Topic in a replacement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInput {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub topic_type: Option<String>,
    #[serde(default)]
    pub ai_system_prompt: Option<String>,
    pub display_order: i64,
}
