//! Activity registration store.
//!
//! Holds the school's activity documents and enforces the per-student
//! registration state machine: a student is either registered for an
//! activity or not, signup and unregister are the only transitions, and each
//! is applied with the backend's atomic conditional update.

pub mod catalog;
mod error;
pub mod store;
mod types;

pub use catalog::initial_activities;
pub use error::{StoreError, StoreResult};
pub use store::{MemoryStore, SqliteStore, Store};
pub use types::*;
