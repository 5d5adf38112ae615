//! Implementation of the `presswright provision` command.
//!
//! Responsibility: find the site documents, wire the adapters, run the core
//! pipeline and display the result. No provisioning logic lives here.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use presswright_adapters::{HttpDownloader, LocalFilesystem, ProcessWpCli};
use presswright_core::{
    application::{Ports, ProvisionReport, ProvisionRequest, ProvisioningOrchestrator, ProvisioningSettings},
    domain::{DbAdmin, FailurePolicy, ProvisioningStage},
};

use crate::{
    cli::{GlobalArgs, OutputFormat, ProvisionArgs},
    commands::{local_loader, reporter_for, site_file},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `presswright provision` command.
///
/// Dispatch sequence:
/// 1. Check that a destructive `--reprovision` can be confirmed
/// 2. Locate and load the site configuration and constants
/// 3. Confirm the reset unless `--yes`
/// 4. Wire the adapters and run the pipeline
/// 5. Print the report
#[instrument(skip_all, fields(environment = %args.environment))]
pub fn execute(
    args: ProvisionArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let ask = needs_confirmation(&args, global.quiet)?;

    // 2. Documents
    let loader = local_loader();
    let site_path = site_file(
        &loader,
        &args.root,
        args.site_config.clone(),
        &config.files.site_config_pattern,
    )?;
    let constants_path = site_file(
        &loader,
        &args.root,
        args.constants.clone(),
        &config.files.constants_pattern,
    )?;
    debug!(site = %site_path.display(), constants = %constants_path.display(), "Documents located");

    let site_config = loader.load_site_configuration(&site_path)?;
    let constants = loader.load_constants(&constants_path)?;

    // 3. Confirm
    if ask {
        output.warning(&format!(
            "--reprovision resets the '{}' database; all data in it is lost",
            args.environment
        ))?;
        if !confirm(&format!("Reset the database of '{}'?", args.environment))? {
            return Err(CliError::Cancelled);
        }
    }

    // 4. Wire and run
    let policy = FailurePolicy::from_strict(args.strict || config.provisioning.strict);
    let reporter = reporter_for(args.platform, &config)?;
    let wp_cli_path = args.wp_cli.clone().unwrap_or_else(|| config.wp_cli.path.clone());
    let ports = Ports {
        wp_cli: Arc::new(ProcessWpCli::new(wp_cli_path).with_working_dir(&args.root)),
        filesystem: Arc::new(LocalFilesystem::new()),
        downloader: Arc::new(HttpDownloader::new()?),
        reporter,
    };
    let settings = ProvisioningSettings {
        policy,
        snippets_dir: args
            .snippets_dir
            .clone()
            .unwrap_or_else(|| config.files.snippets_dir.clone()),
        wp_cli_download_url: config.wp_cli.download_url.clone(),
    };

    let mut orchestrator = ProvisioningOrchestrator::new(ports, settings);
    let progress = output.show_progress().then(stage_progress);
    if let Some(bar) = &progress {
        let bar = bar.clone();
        orchestrator = orchestrator.with_stage_observer(move |stage| {
            bar.set_message(stage.to_string());
            bar.inc(1);
        });
    }

    let request = build_request(&args);
    info!(policy = %policy, reprovision = request.reprovision, "Provisioning");
    let result = orchestrator.provision(&site_config, &constants, &request);

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    let report = result?;

    // 5. Report
    if output.format() == OutputFormat::Json {
        output.json(&report)?;
    } else {
        show_report(&report, &output)?;
    }

    Ok(())
}

/// A reset needs an explicit `--yes` or an interactive answer; `--quiet`
/// suppresses the prompt, so it cannot stand in for either.
fn needs_confirmation(args: &ProvisionArgs, quiet: bool) -> CliResult<bool> {
    if !args.reprovision || args.yes {
        return Ok(false);
    }
    if quiet {
        return Err(CliError::InvalidInput {
            message: "--reprovision with --quiet needs --yes to reset the database".into(),
            source: None,
        });
    }
    Ok(true)
}

fn build_request(args: &ProvisionArgs) -> ProvisionRequest {
    let db_admin = match (&args.db_admin_user, &args.db_admin_password) {
        (Some(user), Some(password)) => Some(DbAdmin {
            user: user.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    ProvisionRequest {
        admin_password: args.admin_password.clone(),
        db_password: args.db_password.clone(),
        reprovision: args.reprovision,
        db_admin,
        db_user_host: args.db_user_host.clone(),
        ..ProvisionRequest::new(args.environment.clone(), args.root.clone())
    }
}

fn stage_progress() -> ProgressBar {
    let bar = ProgressBar::new(ProvisioningStage::ALL.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn show_report(report: &ProvisionReport, output: &OutputManager) -> CliResult<()> {
    output.success(&format!("Provisioned '{}'", report.environment))?;
    output.field(
        "Stages",
        &format!("{}/{}", report.completed.len(), ProvisioningStage::ALL.len()),
    )?;
    output.field("wp-config entries", &report.wp_config_entries.to_string())?;
    output.field("Plugins", &report.plugins_installed.to_string())?;
    output.field("Theme", if report.theme_installed { "installed" } else { "none" })?;
    output.field("Content types", &report.content_types_imported.to_string())?;
    if report.cloudfront_applied {
        output.field("CloudFront", "forwarded proto snippet added")?;
    }
    if let Some(dump) = &report.dump_path {
        output.field("Database dump", &dump.display().to_string())?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation input".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_prompt: &str) -> CliResult<bool> {
    Err(CliError::InvalidInput {
        message: "this build cannot prompt for confirmation; pass --yes".into(),
        source: None,
    })
}
