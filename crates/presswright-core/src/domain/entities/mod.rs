pub mod common;
pub mod constants;
pub mod content;
pub mod environment;
pub mod plugin;
pub mod project_structure;
pub mod site_config;

pub use crate::domain::DomainError;
pub use common::OrderedMap;
pub use constants::Constants;
pub use content::{ContentSettings, ContentSource};
pub use environment::{DatabaseCredentials, Environment, WpConfigEntry};
pub use plugin::{Plugin, PluginSource, Theme, ThemeSourceType};
pub use project_structure::{DefaultContent, ItemKind, ProjectStructure, StructureItem};
pub use site_config::SiteConfiguration;
