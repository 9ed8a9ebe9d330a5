//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_events;
pub mod shell;
pub mod upload;

pub use deploy_events::{DeployEvent, DeployEventSink, LogLevel, NoopEventSink};
pub use shell::{CommandOutput, RemoteSession, SessionConnector, ShellHost};
pub use upload::ArchiveUploader;
