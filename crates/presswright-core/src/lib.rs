//! Presswright Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Presswright,
//! a provisioning tool that turns a declarative `site-config.json` plus a
//! `constants.json` into a configured WordPress installation by driving
//! `wp-cli`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         presswright-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ProvisioningOrchestrator, Resolver,   │
//! │   PluginInstaller, ContentImporter ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (WpCli, Filesystem, Downloader, Reporter)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    presswright-adapters (Infrastructure)│
//! │ (ProcessWpCli, LocalFilesystem, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (SiteConfiguration, Environment,        │
//! │  WpCommand, Token)                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presswright_core::application::{Ports, ProvisioningOrchestrator, ProvisionRequest};
//!
//! let orchestrator = ProvisioningOrchestrator::new(ports, settings);
//! let report = orchestrator.provision(&site_config, &constants, &request)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigurationLoader, EnvironmentResolver, Ports, ProvisionReport, ProvisionRequest,
        ProvisioningOrchestrator, ProvisioningSettings,
        ports::{Downloader, Filesystem, Reporter, WpCli},
    };
    pub use crate::domain::{
        CommandOutput, Constants, Environment, FailurePolicy, Message, ProvisioningStage,
        SiteConfiguration, WpCommand,
    };
    pub use crate::error::{PresswrightError, PresswrightResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
