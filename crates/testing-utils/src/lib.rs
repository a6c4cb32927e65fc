//! # Answers Testing Utils
//!
//! Shared test doubles and builders for the answer service workspace.
//!
//! - **RecordingQueueApi**: queue backend that counts every call, replays
//!   scripted receive batches and injects failures
//! - **RecordingEventRepository**: event store that records appends
//! - **Builders**: received messages and event payloads with sensible defaults
//! - **Helpers**: polling utilities for asynchronous assertions

pub mod builders;
pub mod helpers;
pub mod mocks;

// Re-export commonly used items
pub use builders::*;
pub use helpers::*;
pub use mocks::*;
