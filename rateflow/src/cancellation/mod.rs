//! Batch-wide cooperative cancellation.
//!
//! This module provides:
//! - [`CancellationToken`], shared by a run and all of its in-flight fetches

mod token;

pub use token::CancellationToken;
