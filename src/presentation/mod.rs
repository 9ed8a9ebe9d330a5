//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating the infrastructure a run needs
//!
//! ## Structure
//!
//! - `cli` - Command line flags
//! - `factory` - Connector and uploader construction (dependency injection)

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen};
pub use factory::{create_connector, create_uploader};
