//! Infrastructure adapters for Presswright.
//!
//! This crate implements the ports defined in `presswright-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod download;
pub mod filesystem;
pub mod reporter;
pub mod wp_cli;

// Re-export commonly used adapters
pub use download::HttpDownloader;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use reporter::{AzureDevOpsReporter, TracingReporter};
pub use wp_cli::{ProcessWpCli, RecordingWpCli};
