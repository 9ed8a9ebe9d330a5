//! Dependency Factory
//!
//! Creates the infrastructure a deploy run needs from its configuration.
//! This is the dependency injection point for the application.

use crate::config::DeployConfig;
use crate::infrastructure::{FtpCredentials, NcftpUploader, OpenSshConnector};

/// SSH connector backed by the system OpenSSH client
pub fn create_connector() -> OpenSshConnector {
    OpenSshConnector::default()
}

/// `ncftpput` uploader logged in with `config.ftp`
pub fn create_uploader(config: &DeployConfig) -> NcftpUploader {
    NcftpUploader::new(FtpCredentials {
        host: config.host.clone(),
        username: config.ftp.username.clone(),
        password: config.ftp.password.clone(),
    })
}
