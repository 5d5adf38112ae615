//! `presswright config` inspects the active configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).with_cli_context(|| "Failed to serialise config")?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "platform" => Ok(config.platform.clone()),
        "wp_cli.path" => Ok(config.wp_cli.path.display().to_string()),
        "wp_cli.download_url" => Ok(config.wp_cli.download_url.clone()),
        "files.site_config_pattern" => Ok(config.files.site_config_pattern.clone()),
        "files.constants_pattern" => Ok(config.files.constants_pattern.clone()),
        "files.snippets_dir" => Ok(config.files.snippets_dir.display().to_string()),
        "files.project_structure" => Ok(config.files.project_structure.clone()),
        "provisioning.strict" => Ok(config.provisioning.strict.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
