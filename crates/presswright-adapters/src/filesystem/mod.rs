//! Filesystem adapters.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;

use wax::{CandidatePath, Glob, Pattern};

/// Whether `file_name` matches the glob `pattern`. An invalid glob only
/// matches itself literally.
pub(crate) fn file_name_matches(pattern: &str, file_name: &str) -> bool {
    match Glob::new(pattern) {
        Ok(glob) => glob.matched(&CandidatePath::from(file_name)).is_some(),
        Err(_) => pattern == file_name,
    }
}
