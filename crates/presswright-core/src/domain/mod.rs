// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Presswright.
//!
//! Site configuration model, typed wp-cli commands and the event vocabulary.
//! All I/O (subprocesses, filesystem, HTTP) is handled via ports defined in
//! the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Serde only at the edge**: documents deserialize straight into entities
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//!
// Public API - what the world sees
pub mod command;
pub mod entities;
pub mod error;
pub mod message;
pub mod value_objects;

mod validation;

pub use command::{
    CommandOutput, ConfigCreate, ConfigSet, CoreDownload, CoreInstall, DbAdmin, DbCreate,
    DbCreateUser, DbExport, DbGrant, DbReset, Eval, ImportWxr, OptionUpdate, PluginInstall,
    PostDeleteByType, ThemeInstall, TransientDelete, WpCommand,
};

pub use entities::{
    constants::{ConstantPaths, ContentPaths, RegexEntry},
    environment::{EnvironmentDatabase, WpConfigType},
    site_config::{AdminSettings, DatabaseSettings, DumpSettings, SiteSettings, WpOption},
    Constants, ContentSettings, ContentSource, DatabaseCredentials, DefaultContent, Environment,
    ItemKind, OrderedMap, Plugin, PluginSource, ProjectStructure, SiteConfiguration,
    StructureItem, Theme, ThemeSourceType, WpConfigEntry,
};

pub use error::{DomainError, ErrorCategory};
pub use message::Message;
pub use value_objects::{AuthorsHandling, FailurePolicy, ProvisioningStage, Token, TokenKind};

pub use validation::DomainValidator;
