//! StudyMap Core Taxonomy Layer
//!
//! This crate provides taxonomy storage and the CSV import pipeline for
//! the StudyMap study-planning system: per-user subjects holding a
//! three-level tree of categories, subcategories, and topics.
//!
//! # Architecture
//!
//! - **Flat rows, assembled trees**: categories and topics are stored as
//!   flat rows with explicit parent references; trees are built at read
//!   time
//! - **Soft deletion**: removal sets `deleted_at`, so resubmitting an id
//!   revives the original row
//! - **Full-tree synchronization**: clients submit the complete intended
//!   tree; depth, parents, and deletions are derived from it
//! - **libsql/Turso**: embedded SQLite-compatible database with sync
//!   capability
//!
//! # Modules
//!
//! - [`models`] - Data structures (Subject, Category, Topic, tree views)
//! - [`import`] - Pure CSV parse / convert / merge stages
//! - [`services`] - Business services (TreeService, ImportService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod import;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
