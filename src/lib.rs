//! Leveled Logger Setup
//!
//! Configures a seven-level logger for a named project, writing colorized lines to the
//! console and full-fidelity lines to a general log file and an error-only log file.

pub mod args;
pub mod config;
pub mod errors;
pub mod format;
pub mod logger;
pub mod meta;
pub mod severity;
pub mod sink;

// Re-export commonly used types
pub use config::LoggerConfig;
pub use errors::{LoggerError, Result};
pub use format::{Context, Record, Route};
pub use logger::{create_logger, Entry, Logger};
pub use meta::{ErrorInfo, Meta, MetaValue};
pub use severity::Severity;
pub use sink::{Sink, Threshold};
