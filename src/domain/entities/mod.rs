//! Domain Entities
//!
//! - `FileToUpload` - a local file selected for upload
//! - `RemoteFileRecord` / `Inventory` - the remote snapshot of one pass
//! - `Step` - one entry of the deployment pipeline

mod file_to_upload;
mod inventory;
mod step;

pub use file_to_upload::FileToUpload;
pub use inventory::{Inventory, RemoteFileRecord};
pub use step::{ErrorPolicy, PredefinedStep, ShellStep, Step};
