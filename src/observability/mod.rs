//! Observability module
//!
//! Structured logging for config loading and validation runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
