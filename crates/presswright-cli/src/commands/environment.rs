//! `presswright environment` prints one environment after resolution.

use std::sync::Arc;

use tracing::instrument;

use presswright_core::application::EnvironmentResolver;

use crate::{
    cli::EnvironmentArgs,
    commands::{local_loader, site_file},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Resolve `args.name` and print it as JSON: database defaults filled in,
/// `*_url` constants made absolute.
#[instrument(skip_all, fields(environment = %args.name))]
pub fn execute(args: EnvironmentArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let loader = local_loader();
    let site_path = site_file(
        &loader,
        &args.root,
        args.site_config,
        &config.files.site_config_pattern,
    )?;
    let site_config = loader.load_site_configuration(&site_path)?;

    let reporter = super::reporter_for(None, &config)?;
    let environment = EnvironmentResolver::new(Arc::clone(&reporter)).resolve(&site_config, &args.name)?;

    output.json(&environment)?;
    Ok(())
}
