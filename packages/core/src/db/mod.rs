//! Database Layer
//!
//! This module handles all database interactions using libsql/Turso:
//!
//! - Database initialization and connection management
//! - The `TaxonomyStore` trait abstracting persistence from the services
//! - The libsql implementation (`TursoStore`)
//!
//! # Architecture
//!
//! The taxonomy is stored as flat rows (subjects, categories, topics) with
//! explicit parent references; the service layer assembles the hierarchy
//! at read time. The store trait carries the transaction port: mutation
//! batches run atomically where the backend supports multi-statement
//! transactions, sequentially where it does not (see `taxonomy_store`).

mod database;
mod error;
mod taxonomy_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use taxonomy_store::{TaxonomyStore, TopicScope, TreeMutation};
pub use turso_store::TursoStore;
