//! `presswright start-structure` lays down the skeleton of a site repository.

use std::sync::Arc;

use tracing::instrument;

use presswright_adapters::{HttpDownloader, LocalFilesystem};
use presswright_core::application::StructureStarter;

use crate::{
    cli::{OutputFormat, StartStructureArgs},
    commands::reporter_for,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(root = %args.root.display()))]
pub fn execute(args: StartStructureArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let source = args.source.unwrap_or(config.files.project_structure.clone());
    let starter = StructureStarter::new(
        Arc::new(HttpDownloader::new()?),
        Arc::new(LocalFilesystem::new()),
        reporter_for(None, &config)?,
    );

    let report = starter.start_basic_project_structure(&args.root, &source)?;

    if output.format() == OutputFormat::Json {
        output.json(&serde_json::json!({
            "root": args.root,
            "created": report.created,
            "kept": report.kept,
        }))?;
        return Ok(());
    }

    for path in &report.created {
        output.print(&format!("  + {}", path.display()))?;
    }
    output.success(&format!(
        "{} item(s) created, {} already present",
        report.created.len(),
        report.kept.len()
    ))?;
    Ok(())
}
