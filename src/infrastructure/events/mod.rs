//! Event Sink Implementations
//!
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! The colored console sink lives in the binary (`ui::console`).

mod json;

pub use json::JsonEventSink;
