//! Data Models
//!
//! This module contains the core data structures used throughout StudyMap:
//!
//! - `Subject` - Tenant boundary; every category and topic is scoped to one
//!   (owner, subject) pair
//! - `Category` - Flat taxonomy row (depth 1 or 2) with explicit `parent_id`
//! - `Topic` - Leaf row attached to a depth-2 category
//! - Tree view and request types for the read/synchronize operations
//!
//! Rows are stored flat and re-assembled into a hierarchy at read time via
//! id-indexed maps; there are no self-referencing in-memory structures.

mod category;
mod subject;
mod topic;
mod tree;

pub use category::Category;
pub use subject::Subject;
pub use topic::Topic;
pub use tree::{
    CategoryInput, CategoryTree, SubcategoryInput, SubcategoryTree, SubjectTree, TopicInput,
    TopicView, TreeUpdateRequest,
};
