//! Configuration module for ftpdeploy
//!
//! A deploy file (default `./ftp-deploy.yml`) has two sections:
//! 1. `config` - project type, hosts, paths, credentials, ignores
//! 2. `steps` - the ordered pipeline
//!
//! `${env.NAME}` placeholders are filled from the `.env` next to the file,
//! then from the process environment.

mod env;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use env::{substitute_env, EnvSource};
pub use loader::{
    config_to_json, format_arguments, load_deploy_file, normalize_source_path,
    parse_deploy_document, resolve_reference, LoadedConfig, DEFAULT_CONFIG_FILE,
};
pub use types::{DeployConfig, DeployDocument, FtpConfig, SshConfig};
