//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `TreeService` - Subject tree reads and full-tree synchronization
//! - `ImportService` - CSV import orchestration on top of `TreeService`
//!
//! Services coordinate between the database layer and application logic,
//! implementing business rules and orchestrating complex operations.

pub mod error;
pub mod import_service;
pub mod ports;
pub mod tree_service;

pub use error::TreeServiceError;
pub use import_service::{ImportService, ImportSummary, ImportedCounts};
pub use ports::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use tree_service::TreeService;
