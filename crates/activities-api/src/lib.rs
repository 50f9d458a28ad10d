//! Mergington High School activities API.
//!
//! Lists extracurricular activities and lets students sign up for or
//! unregister from them, with a static front-end served under `/static`.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::ApiError;
