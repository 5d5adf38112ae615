//! Application services - orchestrate use cases.
//!
//! Every wp-cli call goes through one shared [`CommandExecutor`] so the
//! failure policy is applied the same way everywhere. The
//! [`ProvisioningOrchestrator`] composes the other services into the full
//! provisioning pipeline.

pub mod config_file_writer;
pub mod configuration_loader;
pub mod content_importer;
pub mod database_manager;
pub mod environment_resolver;
pub mod executor;
pub mod orchestrator;
pub mod plugin_installer;
pub mod structure_starter;
pub mod token_converter;
pub mod wp_cli_installer;

pub use config_file_writer::ConfigFileWriter;
pub use configuration_loader::{ConfigurationLoader, FilePattern, Uniqueness};
pub use content_importer::ContentImporter;
pub use database_manager::{DatabaseManager, DatabaseUser};
pub use environment_resolver::EnvironmentResolver;
pub use executor::CommandExecutor;
pub use orchestrator::{
    Ports, ProvisionReport, ProvisionRequest, ProvisioningOrchestrator, ProvisioningSettings,
};
pub use plugin_installer::PluginInstaller;
pub use structure_starter::{StructureReport, StructureStarter};
pub use token_converter::TokenConverter;
pub use wp_cli_installer::{DEFAULT_WP_CLI_URL, WP_CLI_BAT, WP_CLI_PHAR, WpCliInstaller};
