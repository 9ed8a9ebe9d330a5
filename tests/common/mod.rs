//! Common test utilities for ftpdeploy pipeline and scenario tests.
//!
//! This module provides:
//! - `TestProject`: temp source tree plus an in-memory fake server
//! - Fakes for the local shell, the SSH session and the FTP upload
//! - `RecordingSink` to assert on emitted events

#![allow(dead_code)]

pub mod fakes;
pub mod project;

pub use fakes::*;
pub use project::*;
