//! TaxonomyStore Trait - Storage Abstraction Layer
//!
//! This module defines the `TaxonomyStore` trait that abstracts persistence
//! for the taxonomy tables. The trait sits between the service layer
//! (`TreeService`, `ImportService`) and the backing store so that the
//! synchronization algorithm is identical regardless of backend.
//!
//! # Transaction Port
//!
//! The synchronizer's whole mutation phase is expressed as a single
//! `Vec<TreeMutation>` handed to [`TaxonomyStore::apply_mutations`].
//! Backends with multi-statement transaction support (local libsql files)
//! execute the batch atomically. Backends without it (certain
//! distributed/edge SQL engines) are permitted to execute the same steps
//! sequentially with no rollback; a failure partway through then leaves a
//! partially-applied tree. That degraded mode is an accepted, documented
//! tradeoff of this abstraction, not an oversight. No locking is defined
//! across concurrent synchronizations of the same subject.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync` so futures holding them can move
//! between threads.

use crate::db::DatabaseError;
use crate::models::{Category, Subject, Topic};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One step of the synchronizer's mutation phase.
///
/// Upserts carry the full target row state: insert when the id is new,
/// otherwise overwrite name/placement/order fields and clear the
/// soft-delete marker (revival). `created_at` is preserved on the update
/// path.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeMutation {
    /// Insert or update a category row, clearing `deleted_at`
    UpsertCategory(Category),

    /// Insert or update a topic row, clearing `deleted_at`
    UpsertTopic(Topic),

    /// Set `deleted_at` on a category row
    SoftDeleteCategory {
        id: String,
        deleted_at: DateTime<Utc>,
    },

    /// Set `deleted_at` on a topic row
    SoftDeleteTopic {
        id: String,
        deleted_at: DateTime<Utc>,
    },
}

/// Ownership scope of a topic row, resolved through its category.
///
/// Used by the synchronizer's validation phase: a referenced topic id must
/// exist (soft-deleted rows acceptable), belong to the requesting user,
/// and transitively belong to a category of the target subject.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScope {
    pub id: String,
    pub owner_id: String,
    pub subject_id: String,
}

/// Abstraction layer for taxonomy persistence operations
///
/// All methods are async to support both embedded and network backends.
/// Queries never return soft-deleted rows unless the method says so;
/// lookups by id include soft-deleted rows because revival depends on
/// seeing them.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    /// Insert a subject row.
    ///
    /// Subject CRUD lives outside this core; this exists so embedding
    /// applications (and tests) can seed the tenant rows the tree
    /// operations are scoped by.
    async fn create_subject(&self, subject: Subject) -> Result<Subject, DatabaseError>;

    /// Get a subject by id, including soft-deleted rows.
    ///
    /// Returns `Ok(None)` when no row exists (not an error). The caller
    /// decides what ownership or deletion state means.
    async fn get_subject(&self, id: &str) -> Result<Option<Subject>, DatabaseError>;

    /// List the non-deleted categories of a subject for one owner,
    /// ascending by display order (depth-1 and depth-2 rows mixed).
    async fn list_categories(
        &self,
        subject_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Category>, DatabaseError>;

    /// List the non-deleted topics under a subject's non-deleted
    /// categories for one owner, ascending by display order.
    async fn list_topics(
        &self,
        subject_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Topic>, DatabaseError>;

    /// Fetch category rows by id, including soft-deleted rows.
    ///
    /// Ids with no row are simply absent from the result; the caller
    /// detects them by comparing against its request set.
    async fn get_categories_by_ids(&self, ids: &[String])
        -> Result<Vec<Category>, DatabaseError>;

    /// Resolve the ownership scope of topic rows by id, including
    /// soft-deleted rows. The subject id comes from the joined category.
    async fn get_topic_scopes(&self, ids: &[String]) -> Result<Vec<TopicScope>, DatabaseError>;

    /// Apply a batch of tree mutations.
    ///
    /// Atomic where the backend supports multi-statement transactions;
    /// otherwise executed sequentially in order, in which case a failure
    /// partway through leaves a partially-applied tree (see module docs).
    /// Validation must happen before calling this method.
    async fn apply_mutations(&self, mutations: Vec<TreeMutation>) -> Result<(), DatabaseError>;
}
