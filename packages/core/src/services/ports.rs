//! Capability Ports - id generation and time
//!
//! The tree synchronizer needs fresh ids and timestamps. Both come in
//! through narrow traits so tests can substitute deterministic
//! implementations and assert exact persisted state.

use chrono::{DateTime, Utc};

/// Source of fresh entity ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production id source backed by UUID v4.
#[derive(Debug, Clone, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
