//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod change_detector;
mod upload_summary;

pub use change_detector::{
    classify, is_up_to_date, normalize_local_mtime, DiffSettings, FileVerdict, LocalFileStat,
};
pub use upload_summary::{normalize_dist_dir, summarize, SummaryLine};
