//! ftpdeploy - incremental remote deployment
//!
//! ftpdeploy compares a local source tree against what is already on a
//! remote target (IIS on Windows or Laravel on Unix), packages only the
//! changed files into one zip archive, uploads it over FTP and runs a
//! configurable post-deploy pipeline over SSH.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployPipeline, RunFlags, RunOutcome};
pub use config::{load_deploy_file, DeployConfig, DeployDocument, LoadedConfig};
pub use error::{DeployError, DeployResult, ErrorKind};
