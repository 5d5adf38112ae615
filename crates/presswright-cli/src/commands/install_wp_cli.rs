//! `presswright install-wp-cli` downloads wp-cli and checks that it runs.

use std::sync::Arc;

use tracing::instrument;

use presswright_adapters::{HttpDownloader, LocalFilesystem, ProcessWpCli};
use presswright_core::{
    application::{CommandExecutor, WpCliInstaller, WP_CLI_PHAR},
    domain::FailurePolicy,
};

use crate::{
    cli::InstallWpCliArgs,
    commands::reporter_for,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: InstallWpCliArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let reporter = reporter_for(None, &config)?;
    // `wp --info` has to run the phar that is about to be downloaded.
    let wp_cli = ProcessWpCli::new(args.dir.join(WP_CLI_PHAR));
    let executor = CommandExecutor::new(Arc::new(wp_cli), reporter.clone(), FailurePolicy::Abort);

    let installer = WpCliInstaller::new(
        executor,
        Arc::new(HttpDownloader::new()?),
        Arc::new(LocalFilesystem::new()),
        reporter,
    )
    .with_download_url(args.url.unwrap_or(config.wp_cli.download_url));

    let phar = installer.install_wp_cli(&args.dir, args.windows_launcher || cfg!(windows))?;

    output.success(&format!("wp-cli installed at {}", phar.display()))?;
    output.info(&format!(
        "Set wp_cli.path = \"{}\" in {} to use it",
        phar.display(),
        AppConfig::config_path().display()
    ))?;
    Ok(())
}
