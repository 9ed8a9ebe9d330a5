//! Platform profiles
//!
//! Everything that differs between a Windows/IIS target and a Unix/Laravel
//! target lives behind the [`Platform`] trait. A profile is chosen once from
//! `config.project_type` and never changes during a run.

mod iis;
mod laravel;

pub use iis::{merge_listings, parse_dir_listing, DirEntry, IisPlatform};
pub use laravel::{find_command, parse_find_output, LaravelPlatform};

use crate::domain::entities::RemoteFileRecord;
use crate::domain::value_objects::{ProjectType, UtcOffset};
use crate::error::DeployResult;

/// Data the listing parsers need besides the raw output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingContext {
    /// Remote target directory, forward slashes, no trailing slash
    pub target_basepath: String,
    pub remote_offset: UtcOffset,
}

/// Platform-specific command vocabulary and listing format
pub trait Platform {
    fn project_type(&self) -> ProjectType;

    /// Line separator used by the host's shell output
    fn line_ending(&self) -> &'static str;

    /// Command that prints the host's wall-clock time
    fn clock_query_command(&self) -> &'static str;

    /// Extract the hour (0-23) from one line of clock output
    fn parse_clock_hour(&self, text: &str) -> Option<u32>;

    /// Whether listing timestamps include seconds
    fn has_second_precision(&self) -> bool;

    fn delete_command(&self) -> &'static str;

    fn unzip_command(&self) -> &'static str;

    /// Run `command` inside `target`
    fn prepend_working_dir(&self, target: &str, command: &str) -> String;

    /// Stdout printed by the working-dir prefix when `target` is missing
    fn missing_target_notice(&self, _target: &str) -> Option<String> {
        None
    }

    /// Commands whose outputs together describe the remote file set
    fn inventory_commands(&self, ignores: &[String]) -> Vec<String>;

    /// Parse the outputs of [`Platform::inventory_commands`], in order
    fn parse_inventory(
        &self,
        outputs: &[String],
        ctx: &ListingContext,
    ) -> DeployResult<Vec<RemoteFileRecord>>;

    /// Like [`Platform::prepend_working_dir`], but commands that already
    /// start with `cd ` are left alone
    fn in_target_dir(&self, target: &str, command: &str) -> String {
        if command.starts_with("cd ") {
            command.to_string()
        } else {
            self.prepend_working_dir(target, command)
        }
    }
}

/// Profile for a configured project type
pub fn platform_for(project_type: ProjectType) -> Box<dyn Platform> {
    match project_type {
        ProjectType::Iis => Box::new(IisPlatform),
        ProjectType::Laravel => Box::new(LaravelPlatform),
    }
}

/// Profile describing the machine ftpdeploy runs on
pub fn local_platform() -> Box<dyn Platform> {
    if cfg!(windows) {
        platform_for(ProjectType::Iis)
    } else {
        platform_for(ProjectType::Laravel)
    }
}
