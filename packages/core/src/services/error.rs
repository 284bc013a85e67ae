//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.

use crate::db::DatabaseError;
use thiserror::Error;

/// Service operation errors
///
/// `SubjectNotFound` deliberately covers both "no such subject" and
/// "subject owned by someone else" so callers cannot distinguish the two
/// and probe for other users' data. The invalid-id variants abort a tree
/// update before any mutation is applied.
#[derive(Error, Debug)]
pub enum TreeServiceError {
    /// Subject missing, soft-deleted, or not owned by the requester
    #[error("Subject not found: {subject_id}")]
    SubjectNotFound { subject_id: String },

    /// Referenced category id unknown, foreign, or from another subject
    #[error("Invalid category id: {id}")]
    InvalidCategoryId { id: String },

    /// Referenced topic id unknown, foreign, or from another subject
    #[error("Invalid topic id: {id}")]
    InvalidTopicId { id: String },

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),
}

impl TreeServiceError {
    /// Create a subject not found error
    pub fn subject_not_found(subject_id: impl Into<String>) -> Self {
        Self::SubjectNotFound {
            subject_id: subject_id.into(),
        }
    }

    /// Create an invalid category id error
    pub fn invalid_category_id(id: impl Into<String>) -> Self {
        Self::InvalidCategoryId { id: id.into() }
    }

    /// Create an invalid topic id error
    pub fn invalid_topic_id(id: impl Into<String>) -> Self {
        Self::InvalidTopicId { id: id.into() }
    }
}
