//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what provisioning needs from the outside world.
//! The `presswright-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{CommandOutput, Message, WpCommand};
use crate::error::PresswrightResult;

/// Port for running wp-cli.
///
/// Implemented by:
/// - `presswright_adapters::wp_cli::ProcessWpCli` (spawns the binary)
/// - `presswright_adapters::wp_cli::RecordingWpCli` (testing)
///
/// Calls block until the process exits. An `Err` means the tool could not
/// be run at all; a non-zero exit is a successful call whose
/// [`CommandOutput`] says so.
#[cfg_attr(test, mockall::automock)]
pub trait WpCli: Send + Sync {
    fn run(&self, command: &WpCommand) -> PresswrightResult<CommandOutput>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `presswright_adapters::filesystem::LocalFilesystem` (production)
/// - `presswright_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole UTF-8 file.
    fn read_to_string(&self, path: &Path) -> PresswrightResult<String>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> PresswrightResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Files below `root` (recursively) whose file name matches the glob
    /// `pattern`, sorted by path.
    fn find_files(&self, root: &Path, pattern: &str) -> PresswrightResult<Vec<PathBuf>>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> PresswrightResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PresswrightResult<()>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> PresswrightResult<()>;
}

/// Port for HTTP downloads.
///
/// Implemented by `presswright_adapters::download::HttpDownloader`.
#[cfg_attr(test, mockall::automock)]
pub trait Downloader: Send + Sync {
    /// Fetch `url` with a GET request and store the body at `destination`.
    fn download(&self, url: &str, destination: &Path) -> PresswrightResult<()>;
}

/// Port for user-visible provisioning events.
///
/// One implementation per CI platform, chosen once at startup:
/// - `presswright_adapters::reporter::TracingReporter`
/// - `presswright_adapters::reporter::AzureDevOpsReporter`
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn info(&self, message: &Message);
    fn warning(&self, message: &Message);
    fn error(&self, message: &Message);
}
