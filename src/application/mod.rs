//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Components
//!
//! - `DeployPipeline` - Runs the step list of a deploy document
//! - `CommandRunner` - One command with its error policy and `--act` handling
//! - `query_offset` - Clock skew per host
//! - `fetch_inventory` - Remote file snapshot
//! - `scan_changes` / `package_changes` - The find-new-files pass

mod clock;
mod context;
mod inventory;
mod pipeline;
mod runner;
mod sync_pass;

pub use clock::{query_offset, utc_hour_now, ClockOffsets};
pub use context::{DeploymentContext, RunFlags};
pub use inventory::{fetch_inventory, InventoryRequest};
pub use pipeline::{restart_iis_site_command, DeployPipeline, RunOutcome};
pub use runner::{CommandResult, CommandRunner, ShellRequest};
pub use sync_pass::{package_changes, scan_changes, ChangeScan, PackageOutcome};
