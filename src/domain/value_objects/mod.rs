//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod host_role;
mod ignore_patterns;
mod project_type;
mod ssh_target;
mod utc_offset;

pub use config_warning::ConfigWarning;
pub use host_role::HostRole;
pub use ignore_patterns::{IgnoreError, IgnorePatterns};
pub use project_type::ProjectType;
pub use ssh_target::SshTarget;
pub use utc_offset::UtcOffset;
