//! Logging setup and timing helpers.
//!
//! This module provides:
//! - [`init_logging`], which installs the global `tracing` subscriber
//! - [`SpanTimer`] for measuring run phases

mod logging;
mod timer;

pub use logging::init_logging;
pub use timer::SpanTimer;
