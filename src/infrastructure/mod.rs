//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `platform/` - IIS and Laravel command profiles and listing parsers
//! - `fs/` - Local source tree walker
//! - `transport/` - FTP upload through `ncftpput`
//! - `events/` - NDJSON event sink
//! - `shell`, `ssh` - Local and remote command execution

pub mod archive;
pub mod events;
pub mod fs;
pub mod platform;
pub mod shell;
pub mod ssh;
pub mod transport;

// Re-export for convenience
pub use archive::{build_archive, remove_archive, ArchiveReport, ARCHIVE_FILE_NAME};
pub use events::JsonEventSink;
pub use fs::{walk_source_tree, LocalFile, WalkEntry};
pub use platform::{local_platform, platform_for, ListingContext, Platform};
pub use shell::LocalShell;
pub use ssh::{OpenSshConnector, SshSession};
pub use transport::{FtpCredentials, HostOs, NcftpUploader};
