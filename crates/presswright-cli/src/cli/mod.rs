//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "presswright",
    bin_name = "presswright",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "WordPress site provisioning on top of wp-cli",
    long_about = "Presswright turns a declarative site-config.json into a running \
                  WordPress installation by driving wp-cli.",
    after_help = "EXAMPLES:\n\
        \x20 presswright provision ./my-site -e localhost --admin-password secret\n\
        \x20 presswright environment staging --root ./my-site\n\
        \x20 presswright install-wp-cli /usr/local/lib/wp-cli\n\
        \x20 presswright start-structure ./my-site\n\
        \x20 presswright completions bash > /usr/share/bash-completion/completions/presswright",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision one environment of a site.
    #[command(
        visible_alias = "p",
        about = "Provision a WordPress site",
        after_help = "EXAMPLES:\n\
            \x20 presswright provision . -e localhost\n\
            \x20 presswright provision ./site -e staging --strict --platform azure-devops\n\
            \x20 presswright provision ./site -e localhost --reprovision --yes"
    )]
    Provision(ProvisionArgs),

    /// Print one environment after resolution.
    #[command(
        visible_alias = "env",
        about = "Show a resolved environment",
        after_help = "EXAMPLES:\n\
            \x20 presswright environment localhost\n\
            \x20 presswright environment production --root ./site"
    )]
    Environment(EnvironmentArgs),

    /// Download wp-cli and check it runs.
    #[command(
        about = "Install wp-cli",
        after_help = "EXAMPLES:\n\
            \x20 presswright install-wp-cli ~/.local/lib/wp-cli\n\
            \x20 presswright install-wp-cli C:\\tools\\wp-cli --windows-launcher"
    )]
    InstallWpCli(InstallWpCliArgs),

    /// Create the directory skeleton of a new site repository.
    #[command(
        about = "Start a basic project structure",
        after_help = "EXAMPLES:\n\
            \x20 presswright start-structure ./my-site\n\
            \x20 presswright start-structure . --source https://example.com/structure.json"
    )]
    StartStructure(StartStructureArgs),

    /// Initialise a Presswright configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 presswright init           # default location\n\
            \x20 presswright init --local   # .presswright.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 presswright completions bash > ~/.local/share/bash-completion/completions/presswright\n\
            \x20 presswright completions zsh  > ~/.zfunc/_presswright\n\
            \x20 presswright completions fish > ~/.config/fish/completions/presswright.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Presswright configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 presswright config get provisioning.strict\n\
            \x20 presswright config list\n\
            \x20 presswright config path"
    )]
    Config(ConfigCommands),
}

// ── provision ─────────────────────────────────────────────────────────────────

/// Arguments for `presswright provision`.
#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Site repository root.
    #[arg(value_name = "ROOT", default_value = ".", help = "Site repository root")]
    pub root: PathBuf,

    /// Environment to provision, as named in the site configuration.
    #[arg(
        short = 'e',
        long = "environment",
        value_name = "NAME",
        env = "PRESSWRIGHT_ENVIRONMENT",
        help = "Environment name"
    )]
    pub environment: String,

    /// Explicit site configuration file instead of searching ROOT.
    #[arg(long = "site-config", value_name = "FILE", help = "Site configuration file")]
    pub site_config: Option<PathBuf>,

    /// Directory layout document.
    #[arg(long = "constants", value_name = "FILE", help = "Path to constants.json")]
    pub constants: Option<PathBuf>,

    /// WordPress administrator password.
    #[arg(
        long = "admin-password",
        value_name = "PASSWORD",
        env = "PRESSWRIGHT_ADMIN_PASSWORD",
        hide_env_values = true,
        help = "Administrator password for core install"
    )]
    pub admin_password: Option<String>,

    /// Database user password.
    #[arg(
        long = "db-password",
        value_name = "PASSWORD",
        env = "PRESSWRIGHT_DB_PASSWORD",
        hide_env_values = true,
        help = "Password of the site's database user"
    )]
    pub db_password: Option<String>,

    /// Privileged database account used to create the schema and user.
    #[arg(
        long = "db-admin-user",
        value_name = "USER",
        requires = "db_admin_password",
        help = "Privileged database account"
    )]
    pub db_admin_user: Option<String>,

    #[arg(
        long = "db-admin-password",
        value_name = "PASSWORD",
        env = "PRESSWRIGHT_DB_ADMIN_PASSWORD",
        hide_env_values = true,
        requires = "db_admin_user",
        help = "Password of the privileged database account"
    )]
    pub db_admin_password: Option<String>,

    /// Host part of the created database user.
    #[arg(
        long = "db-user-host",
        value_name = "HOST",
        default_value = "localhost",
        help = "Host the database user connects from"
    )]
    pub db_user_host: String,

    /// Abort on the first failed wp-cli command.
    #[arg(long = "strict", help = "Stop at the first failed wp-cli command")]
    pub strict: bool,

    /// Reset the database instead of creating it (destructive).
    #[arg(long = "reprovision", help = "Reset an existing database")]
    pub reprovision: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
    pub yes: bool,

    /// Where diagnostics are written.
    #[arg(long = "platform", value_enum, help = "Diagnostics format")]
    pub platform: Option<Platform>,

    /// wp-cli launcher to run.
    #[arg(long = "wp-cli", value_name = "PROGRAM", help = "wp-cli executable or phar")]
    pub wp_cli: Option<PathBuf>,

    /// Directory holding the PHP snippets inserted into wp-config.php.
    #[arg(long = "snippets-dir", value_name = "DIR", help = "PHP snippet directory")]
    pub snippets_dir: Option<PathBuf>,
}

/// Diagnostics sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    /// Structured log lines on stderr.
    #[default]
    Local,
    /// Azure DevOps `##vso` logging commands on stdout.
    AzureDevops,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

// ── environment ───────────────────────────────────────────────────────────────

/// Arguments for `presswright environment`.
#[derive(Debug, Args)]
pub struct EnvironmentArgs {
    /// Environment name.
    #[arg(value_name = "NAME", help = "Environment name")]
    pub name: String,

    /// Site repository root.
    #[arg(short = 'r', long = "root", default_value = ".", help = "Site repository root")]
    pub root: PathBuf,

    /// Explicit site configuration file instead of searching ROOT.
    #[arg(long = "site-config", value_name = "FILE", help = "Site configuration file")]
    pub site_config: Option<PathBuf>,
}

// ── install-wp-cli ────────────────────────────────────────────────────────────

/// Arguments for `presswright install-wp-cli`.
#[derive(Debug, Args)]
pub struct InstallWpCliArgs {
    /// Directory that receives `wp-cli.phar`.
    #[arg(value_name = "DIR", help = "Install directory")]
    pub dir: PathBuf,

    /// Override the download location.
    #[arg(long = "url", value_name = "URL", help = "wp-cli.phar download URL")]
    pub url: Option<String>,

    /// Also write a `wp.bat` launcher.
    #[arg(long = "windows-launcher", help = "Write wp.bat next to the phar")]
    pub windows_launcher: bool,
}

// ── start-structure ──────────────────────────────────────────────────────────

/// Arguments for `presswright start-structure`.
#[derive(Debug, Args)]
pub struct StartStructureArgs {
    /// Site repository root; must already exist.
    #[arg(value_name = "ROOT", default_value = ".", help = "Site repository root")]
    pub root: PathBuf,

    /// Structure document to apply instead of `files.project_structure`.
    #[arg(long = "source", value_name = "PATH|URL", help = "Project structure document")]
    pub source: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `presswright init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.presswright.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `presswright completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `presswright config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `provisioning.strict`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_provision_command() {
        let cli = Cli::parse_from([
            "presswright",
            "provision",
            "./site",
            "-e",
            "localhost",
            "--strict",
        ]);
        let Commands::Provision(args) = cli.command else {
            panic!("expected Provision command");
        };
        assert_eq!(args.root, PathBuf::from("./site"));
        assert_eq!(args.environment, "localhost");
        assert!(args.strict);
        assert!(!args.reprovision);
        assert_eq!(args.db_user_host, "localhost");
    }

    #[test]
    fn provision_root_defaults_to_cwd() {
        let cli = Cli::parse_from(["presswright", "provision", "-e", "staging"]);
        let Commands::Provision(args) = cli.command else {
            panic!("expected Provision command");
        };
        assert_eq!(args.root, PathBuf::from("."));
    }

    #[test]
    fn db_admin_user_requires_password() {
        let result = Cli::try_parse_from([
            "presswright",
            "provision",
            "-e",
            "localhost",
            "--db-admin-user",
            "root",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn platform_accepts_kebab_case() {
        let cli = Cli::parse_from([
            "presswright",
            "provision",
            "-e",
            "localhost",
            "--platform",
            "azure-devops",
        ]);
        let Commands::Provision(args) = cli.command else {
            panic!("expected Provision command");
        };
        assert_eq!(args.platform, Some(Platform::AzureDevops));
        assert_eq!("azure-devops".parse::<Platform>(), Ok(Platform::AzureDevops));
    }

    #[test]
    fn environment_alias() {
        let cli = Cli::parse_from(["presswright", "env", "localhost"]);
        assert!(matches!(cli.command, Commands::Environment(_)));
    }

    #[test]
    fn start_structure_defaults_to_cwd_and_config_source() {
        let cli = Cli::parse_from(["presswright", "start-structure"]);
        let Commands::StartStructure(args) = cli.command else {
            panic!("expected StartStructure command");
        };
        assert_eq!(args.root, PathBuf::from("."));
        assert!(args.source.is_none());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["presswright", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
