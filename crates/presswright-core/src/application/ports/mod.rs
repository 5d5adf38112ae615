//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `presswright-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `WpCli`: wp-cli invocations
//!   - `Filesystem`: File operations
//!   - `Downloader`: HTTP GET to a file
//!   - `Reporter`: Platform-specific event reporting
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Downloader, Filesystem, Reporter, WpCli};

#[cfg(test)]
pub use output::{MockDownloader, MockFilesystem, MockReporter, MockWpCli};
