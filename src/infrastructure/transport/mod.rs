//! FTP hand-off of the deployment archive

mod ncftp;

pub use ncftp::{
    classify_failure, install_hint, remote_upload_dir, FtpCredentials, HostOs, NcftpUploader,
    UPLOAD_TOOL,
};
