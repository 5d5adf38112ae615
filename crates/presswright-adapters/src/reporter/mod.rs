//! Reporter adapters, one per CI platform.

mod azure_devops;
mod local;

pub use azure_devops::AzureDevOpsReporter;
pub use local::TracingReporter;
