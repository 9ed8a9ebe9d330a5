//! `ncftpput` invocation and failure classification

use std::path::Path;
use std::process::Command;

use crate::domain::ports::ArchiveUploader;
use crate::error::{DeployError, DeployResult};

/// Upload client binary
pub const UPLOAD_TOOL: &str = "ncftpput";

const TOOL_MISSING_PHRASES: [&str; 4] = [
    "command not found",
    "not recognized as an internal or external command",
    "wurde nicht als Name eines Cmdlet",
    "ist entweder falsch geschrieben oder",
];

/// Operating system of the machine running the upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            _ => HostOs::Other,
        }
    }
}

/// Where to get `ncftpput` on `os`
pub fn install_hint(os: HostOs) -> &'static str {
    match os {
        HostOs::Windows => "Please install it from https://www.ncftp.com/download/",
        HostOs::Linux => "Please install it using \"sudo apt-get install ncftp\"",
        HostOs::MacOs => {
            "Please install it using \"brew install ncftp\" or any other package manager you use!"
        }
        HostOs::Other => "Please install it.",
    }
}

/// Map a failed upload's stderr to a typed error
pub fn classify_failure(stderr: &str, os: HostOs) -> DeployError {
    let first_line = stderr.lines().next().unwrap_or("");
    if TOOL_MISSING_PHRASES.iter().any(|p| first_line.contains(p)) {
        DeployError::UploadToolMissing {
            tool: UPLOAD_TOOL.to_string(),
            hint: install_hint(os).to_string(),
        }
    } else {
        DeployError::UploadFailed(stderr.trim().to_string())
    }
}

/// Remote directory for the upload: the target base path relative to the
/// FTP root
pub fn remote_upload_dir(target_basepath: &str, ftp_base_path: &str) -> String {
    let stripped = target_basepath
        .strip_prefix(ftp_base_path)
        .unwrap_or(target_basepath);
    let mut dir = stripped.to_string();
    while dir.contains("//") {
        dir = dir.replace("//", "/");
    }
    if dir.is_empty() {
        dir.push('/');
    }
    dir
}

/// Login for the FTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpCredentials {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Uploads the archive by running `ncftpput`
#[derive(Debug, Clone)]
pub struct NcftpUploader {
    program: String,
    os: HostOs,
    creds: FtpCredentials,
}

impl NcftpUploader {
    pub fn new(creds: FtpCredentials) -> Self {
        Self {
            program: UPLOAD_TOOL.to_string(),
            os: HostOs::current(),
            creds,
        }
    }

    /// Use another binary in place of `ncftpput`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Shell command line, as the operator would type it
    pub fn command_line(&self, archive: &Path, remote_dir: &str) -> String {
        self.render(&self.creds.password, archive, remote_dir)
    }

    fn render(&self, password: &str, archive: &Path, remote_dir: &str) -> String {
        format!(
            "{} -R -v -u \"{}\" -p \"{}\" {} {} {}",
            self.program,
            self.creds.username,
            password,
            self.creds.host,
            remote_dir,
            archive.display()
        )
    }
}

impl ArchiveUploader for NcftpUploader {
    fn display_command(&self, archive: &Path, remote_dir: &str) -> String {
        self.render("********", archive, remote_dir)
    }

    fn upload(&self, archive: &Path, remote_dir: &str) -> DeployResult<()> {
        let output = Command::new(&self.program)
            .args([
                "-R",
                "-v",
                "-u",
                &self.creds.username,
                "-p",
                &self.creds.password,
            ])
            .arg(&self.creds.host)
            .arg(remote_dir)
            .arg(archive)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeployError::UploadToolMissing {
                    tool: UPLOAD_TOOL.to_string(),
                    hint: install_hint(self.os).to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            format!("{} exited with {}", self.program, output.status)
        } else {
            stderr.into_owned()
        };
        Err(classify_failure(&message, self.os))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> FtpCredentials {
        FtpCredentials {
            host: "example.com".to_string(),
            username: "deploy".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn remote_dir_strips_ftp_base() {
        assert_eq!(remote_upload_dir("/var/www/app", "/var/www"), "/app");
        assert_eq!(remote_upload_dir("/var/www//app", "/var/www"), "/app");
        assert_eq!(remote_upload_dir("C:/inetpub/site", "C:/inetpub/"), "site");
        assert_eq!(remote_upload_dir("/srv/app", "/other"), "/srv/app");
        assert_eq!(remote_upload_dir("/var/www", "/var/www"), "/");
    }

    #[test]
    fn command_line_matches_ncftpput_usage() {
        let uploader = NcftpUploader::new(creds());
        let archive = Path::new("ftpdeploy_archive.zip");
        insta::assert_snapshot!(
            uploader.command_line(archive, "/app"),
            @r#"ncftpput -R -v -u "deploy" -p "s3cret" example.com /app ftpdeploy_archive.zip"#
        );
        let shown = uploader.display_command(archive, "/app");
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("-p \"********\""));
    }

    #[test]
    fn tool_missing_is_detected_from_first_line() {
        let err = classify_failure("sh: ncftpput: command not found\n", HostOs::Linux);
        match err {
            DeployError::UploadToolMissing { tool, hint } => {
                assert_eq!(tool, "ncftpput");
                assert!(hint.contains("apt-get"));
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = classify_failure(
            "Die Benennung \"ncftpput\" wurde nicht als Name eines Cmdlet erkannt",
            HostOs::Windows,
        );
        assert!(matches!(err, DeployError::UploadToolMissing { .. }));
    }

    #[test]
    fn other_failures_keep_raw_error() {
        let err = classify_failure("Login incorrect.\nretrying", HostOs::MacOs);
        match err {
            DeployError::UploadFailed(raw) => assert!(raw.starts_with("Login incorrect.")),
            other => panic!("unexpected {:?}", other),
        }
        // phrase on a later line does not count
        let err = classify_failure("first\ncommand not found", HostOs::Linux);
        assert!(matches!(err, DeployError::UploadFailed(_)));
    }

    #[test]
    fn hints_per_os() {
        assert!(install_hint(HostOs::Windows).contains("ncftp.com"));
        assert!(install_hint(HostOs::MacOs).contains("brew install ncftp"));
        assert_eq!(install_hint(HostOs::Other), "Please install it.");
    }

    #[test]
    fn missing_binary_maps_to_tool_missing() {
        let uploader = NcftpUploader::new(creds()).with_program("ftpdeploy-no-such-binary-xyz");
        let err = uploader.upload(Path::new("x.zip"), "/app").unwrap_err();
        assert!(matches!(err, DeployError::UploadToolMissing { .. }));
    }
}
