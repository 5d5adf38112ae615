//! Typed wp-cli command surface.
//!
//! One options struct per wp-cli command. Every command renders to an argv
//! vector (the binary itself is supplied by the adapter) and is validated
//! before it is handed to the `WpCli` port.

use std::fmt;
use std::path::PathBuf;

use super::entities::environment::WpConfigType;
use super::error::DomainError;
use super::value_objects::AuthorsHandling;

const REDACTED: &str = "********";

/// Credentials passed to `db` subcommands that need a privileged account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbAdmin {
    pub user: String,
    pub password: String,
}

impl DbAdmin {
    fn push_args(admin: Option<&DbAdmin>, args: &mut Vec<String>) {
        if let Some(admin) = admin {
            args.push(format!("--dbuser={}", admin.user));
            args.push(format!("--dbpass={}", admin.password));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCreate {
    pub path: PathBuf,
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_pass: Option<String>,
    pub db_prefix: String,
    pub db_charset: String,
    pub db_collate: String,
    pub skip_check: bool,
    pub force: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSet {
    pub path: PathBuf,
    pub name: String,
    pub value: String,
    pub kind: WpConfigType,
    pub raw: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreDownload {
    pub path: PathBuf,
    pub version: String,
    pub locale: String,
    pub skip_content: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreInstall {
    pub path: PathBuf,
    pub url: String,
    pub title: String,
    pub admin_user: String,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub skip_email: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCreate {
    pub path: PathBuf,
    pub admin: Option<DbAdmin>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbExport {
    pub path: PathBuf,
    pub dump_path: PathBuf,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbReset {
    pub path: PathBuf,
    /// Skip the interactive confirmation.
    pub yes: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCreateUser {
    pub path: PathBuf,
    pub admin: Option<DbAdmin>,
    pub user_name: String,
    pub user_password: String,
    pub host: String,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbGrant {
    pub path: PathBuf,
    pub admin: Option<DbAdmin>,
    pub privileges: String,
    pub schema: String,
    pub user_name: String,
    pub host: String,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientDelete {
    pub path: PathBuf,
    pub all: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eval {
    pub path: PathBuf,
    pub php_code: String,
    /// Run without loading WordPress (no wp-config or database needed).
    pub skip_wordpress: bool,
    pub debug: bool,
}

impl Eval {
    /// `echo date('<format>');`, which needs PHP but not WordPress.
    pub fn date(path: PathBuf, format: &str, debug: bool) -> Self {
        Self {
            path,
            php_code: format!("echo date('{format}');"),
            skip_wordpress: true,
            debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionUpdate {
    pub path: PathBuf,
    pub name: String,
    pub value: String,
    pub autoload: Option<bool>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInstall {
    pub path: PathBuf,
    /// Declared plugin name.
    pub name: String,
    /// Slug, URL or local zip path handed to `wp plugin install`.
    pub source: String,
    pub activate: bool,
    pub force: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInstall {
    pub path: PathBuf,
    pub source: String,
    pub activate: bool,
    pub force: bool,
    pub debug: bool,
}

/// Permanently deletes every post of one post type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDeleteByType {
    pub path: PathBuf,
    pub post_type: String,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWxr {
    pub path: PathBuf,
    pub file: PathBuf,
    pub authors: AuthorsHandling,
    pub debug: bool,
}

/// A single wp-cli invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WpCommand {
    ConfigCreate(ConfigCreate),
    ConfigSet(ConfigSet),
    CoreDownload(CoreDownload),
    CoreInstall(CoreInstall),
    DbCreate(DbCreate),
    DbExport(DbExport),
    DbReset(DbReset),
    DbCreateUser(DbCreateUser),
    DbGrant(DbGrant),
    TransientDelete(TransientDelete),
    Eval(Eval),
    Info,
    OptionUpdate(OptionUpdate),
    PluginInstall(PluginInstall),
    ThemeInstall(ThemeInstall),
    PostDeleteByType(PostDeleteByType),
    ImportWxr(ImportWxr),
}

impl WpCommand {
    /// Short human name, e.g. `config create`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConfigCreate(_) => "config create",
            Self::ConfigSet(_) => "config set",
            Self::CoreDownload(_) => "core download",
            Self::CoreInstall(_) => "core install",
            Self::DbCreate(_) => "db create",
            Self::DbExport(_) => "db export",
            Self::DbReset(_) => "db reset",
            Self::DbCreateUser(_) => "db query create user",
            Self::DbGrant(_) => "db query grant",
            Self::TransientDelete(_) => "transient delete",
            Self::Eval(_) => "eval",
            Self::Info => "--info",
            Self::OptionUpdate(_) => "option update",
            Self::PluginInstall(_) => "plugin install",
            Self::ThemeInstall(_) => "theme install",
            Self::PostDeleteByType(_) => "post delete",
            Self::ImportWxr(_) => "import",
        }
    }

    fn debug(&self) -> bool {
        match self {
            Self::ConfigCreate(c) => c.debug,
            Self::ConfigSet(c) => c.debug,
            Self::CoreDownload(c) => c.debug,
            Self::CoreInstall(c) => c.debug,
            Self::DbCreate(c) => c.debug,
            Self::DbExport(c) => c.debug,
            Self::DbReset(c) => c.debug,
            Self::DbCreateUser(c) => c.debug,
            Self::DbGrant(c) => c.debug,
            Self::TransientDelete(c) => c.debug,
            Self::Eval(c) => c.debug,
            Self::Info => false,
            Self::OptionUpdate(c) => c.debug,
            Self::PluginInstall(c) => c.debug,
            Self::ThemeInstall(c) => c.debug,
            Self::PostDeleteByType(c) => c.debug,
            Self::ImportWxr(c) => c.debug,
        }
    }

    /// Arguments after the wp-cli binary.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Self::ConfigCreate(c) => {
                args.extend(words(&["config", "create"]));
                args.push(path_arg(&c.path));
                args.push(format!("--dbhost={}", c.db_host));
                args.push(format!("--dbname={}", c.db_name));
                args.push(format!("--dbuser={}", c.db_user));
                if let Some(pass) = &c.db_pass {
                    args.push(format!("--dbpass={pass}"));
                }
                args.push(format!("--dbprefix={}", c.db_prefix));
                args.push(format!("--dbcharset={}", c.db_charset));
                if !c.db_collate.is_empty() {
                    args.push(format!("--dbcollate={}", c.db_collate));
                }
                flag(&mut args, c.force, "--force");
                flag(&mut args, c.skip_check, "--skip-check");
            }
            Self::ConfigSet(c) => {
                args.extend(words(&["config", "set"]));
                args.push(c.name.clone());
                args.push(c.value.clone());
                flag(&mut args, c.raw, "--raw");
                args.push(format!("--type={}", c.kind));
                args.push(path_arg(&c.path));
            }
            Self::CoreDownload(c) => {
                args.extend(words(&["core", "download"]));
                args.push(format!("--version={}", c.version));
                args.push(format!("--locale={}", c.locale));
                args.push(path_arg(&c.path));
                flag(&mut args, c.skip_content, "--skip-content");
            }
            Self::CoreInstall(c) => {
                args.extend(words(&["core", "install"]));
                args.push(path_arg(&c.path));
                args.push(format!("--url={}", c.url));
                args.push(format!("--title={}", c.title));
                args.push(format!("--admin_user={}", c.admin_user));
                args.push(format!("--admin_email={}", c.admin_email));
                if let Some(password) = &c.admin_password {
                    args.push(format!("--admin_password={password}"));
                }
                flag(&mut args, c.skip_email, "--skip-email");
            }
            Self::DbCreate(c) => {
                args.extend(words(&["db", "create"]));
                DbAdmin::push_args(c.admin.as_ref(), &mut args);
                args.push(path_arg(&c.path));
            }
            Self::DbExport(c) => {
                args.extend(words(&["db", "export"]));
                args.push(c.dump_path.display().to_string());
                args.push(path_arg(&c.path));
                args.push("--extended-insert=false".into());
            }
            Self::DbReset(c) => {
                args.extend(words(&["db", "reset"]));
                args.push(path_arg(&c.path));
                flag(&mut args, c.yes, "--yes");
            }
            Self::DbCreateUser(c) => {
                args.extend(words(&["db", "query"]));
                DbAdmin::push_args(c.admin.as_ref(), &mut args);
                args.push(path_arg(&c.path));
                args.push(format!(
                    "CREATE USER '{}'@'{}' IDENTIFIED BY '{}'",
                    c.user_name, c.host, c.user_password
                ));
            }
            Self::DbGrant(c) => {
                args.extend(words(&["db", "query"]));
                DbAdmin::push_args(c.admin.as_ref(), &mut args);
                args.push(path_arg(&c.path));
                args.push(format!(
                    "GRANT {} ON {}.* TO '{}'@'{}'",
                    c.privileges, c.schema, c.user_name, c.host
                ));
            }
            Self::TransientDelete(c) => {
                args.extend(words(&["transient", "delete"]));
                flag(&mut args, c.all, "--all");
                args.push(path_arg(&c.path));
            }
            Self::Eval(c) => {
                args.push("eval".into());
                args.push(c.php_code.clone());
                args.push(path_arg(&c.path));
                flag(&mut args, c.skip_wordpress, "--skip-wordpress");
            }
            Self::Info => args.push("--info".into()),
            Self::OptionUpdate(c) => {
                args.extend(words(&["option", "update"]));
                args.push(c.name.clone());
                args.push(c.value.clone());
                if let Some(autoload) = c.autoload {
                    args.push(format!("--autoload={}", if autoload { "yes" } else { "no" }));
                }
                args.push(path_arg(&c.path));
            }
            Self::PluginInstall(c) => {
                args.extend(words(&["plugin", "install"]));
                args.push(c.source.clone());
                args.push(path_arg(&c.path));
                flag(&mut args, c.activate, "--activate");
                flag(&mut args, c.force, "--force");
            }
            Self::ThemeInstall(c) => {
                args.extend(words(&["theme", "install"]));
                args.push(c.source.clone());
                args.push(path_arg(&c.path));
                flag(&mut args, c.activate, "--activate");
                flag(&mut args, c.force, "--force");
            }
            Self::PostDeleteByType(c) => {
                args.push("eval".into());
                args.push(format!(
                    "foreach (get_posts(['post_type' => '{}', 'post_status' => 'any', \
                     'numberposts' => -1, 'fields' => 'ids']) as $id) {{ wp_delete_post($id, true); }}",
                    c.post_type
                ));
                args.push(path_arg(&c.path));
            }
            Self::ImportWxr(c) => {
                args.push("import".into());
                args.push(c.file.display().to_string());
                args.push(format!("--authors={}", c.authors));
                args.push(path_arg(&c.path));
            }
        }
        flag(&mut args, self.debug(), "--debug");
        args
    }

    /// Same as [`WpCommand::to_args`] with secrets masked, for logs.
    pub fn redacted_args(&self) -> Vec<String> {
        let secrets: Vec<&str> = match self {
            Self::ConfigCreate(c) => c.db_pass.iter().map(String::as_str).collect(),
            Self::CoreInstall(c) => c.admin_password.iter().map(String::as_str).collect(),
            Self::DbCreate(c) => c.admin.iter().map(|a| a.password.as_str()).collect(),
            Self::DbCreateUser(c) => c
                .admin
                .iter()
                .map(|a| a.password.as_str())
                .chain(std::iter::once(c.user_password.as_str()))
                .collect(),
            Self::DbGrant(c) => c.admin.iter().map(|a| a.password.as_str()).collect(),
            _ => Vec::new(),
        };
        self.to_args()
            .into_iter()
            .map(|arg| {
                secrets
                    .iter()
                    .filter(|s| !s.is_empty())
                    .fold(arg, |acc, secret| acc.replace(secret, REDACTED))
            })
            .collect()
    }

    /// Reject commands that would render to something wp-cli cannot run.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name();
        match self {
            Self::ConfigCreate(c) => {
                required(name, "dbname", &c.db_name)?;
                required(name, "dbuser", &c.db_user)?;
                required(name, "dbhost", &c.db_host)
            }
            Self::ConfigSet(c) => required(name, "name", &c.name),
            Self::CoreDownload(c) => {
                required(name, "version", &c.version)?;
                required(name, "locale", &c.locale)
            }
            Self::CoreInstall(c) => {
                required(name, "url", &c.url)?;
                required(name, "title", &c.title)?;
                required(name, "admin_user", &c.admin_user)?;
                required(name, "admin_email", &c.admin_email)
            }
            Self::DbCreateUser(c) => {
                sql_literal(name, "user_name", &c.user_name)?;
                sql_literal(name, "host", &c.host)?;
                sql_literal(name, "user_password", &c.user_password)
            }
            Self::DbGrant(c) => {
                sql_literal(name, "user_name", &c.user_name)?;
                sql_literal(name, "host", &c.host)?;
                identifier(name, "schema", &c.schema)?;
                if c.privileges.trim().is_empty()
                    || !c
                        .privileges
                        .chars()
                        .all(|ch| ch.is_ascii_alphabetic() || ch == ' ' || ch == ',' || ch == '_')
                {
                    return Err(invalid(name, "privileges must be a comma separated keyword list"));
                }
                Ok(())
            }
            Self::DbExport(c) => required(name, "dump_path", &c.dump_path.display().to_string()),
            Self::Eval(c) => required(name, "php_code", &c.php_code),
            Self::OptionUpdate(c) => required(name, "option name", &c.name),
            Self::PluginInstall(c) => required(name, "source", &c.source),
            Self::ThemeInstall(c) => required(name, "source", &c.source),
            Self::PostDeleteByType(c) => identifier(name, "post_type", &c.post_type),
            Self::ImportWxr(c) => {
                required(name, "file", &c.file.display().to_string())?;
                required(name, "authors", c.authors.as_str())
            }
            Self::DbCreate(_) | Self::DbReset(_) | Self::TransientDelete(_) | Self::Info => Ok(()),
        }
    }
}

impl fmt::Display for WpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wp {}", self.redacted_args().join(" "))
    }
}

/// What a finished wp-cli process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

fn path_arg(path: &std::path::Path) -> String {
    format!("--path={}", path.display())
}

fn flag(args: &mut Vec<String>, enabled: bool, name: &str) {
    if enabled {
        args.push(name.to_string());
    }
}

fn invalid(command: &'static str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidCommand {
        command,
        reason: reason.into(),
    }
}

fn required(command: &'static str, field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(invalid(command, format!("{field} must not be empty")));
    }
    Ok(())
}

fn sql_literal(command: &'static str, field: &str, value: &str) -> Result<(), DomainError> {
    required(command, field, value)?;
    if value.contains('\'') || value.contains('\\') {
        return Err(invalid(command, format!("{field} must not contain quotes")));
    }
    Ok(())
}

fn identifier(command: &'static str, field: &str, value: &str) -> Result<(), DomainError> {
    required(command, field, value)?;
    if !value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(invalid(
            command,
            format!("{field} may only contain letters, digits, '_' and '-'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp() -> PathBuf {
        PathBuf::from("/site/wordpress")
    }

    #[test]
    fn plugin_install_renders_flags_in_order() {
        let cmd = WpCommand::PluginInstall(PluginInstall {
            path: wp(),
            name: "akismet".into(),
            source: "akismet".into(),
            activate: true,
            force: false,
            debug: true,
        });
        assert_eq!(
            cmd.to_args(),
            vec![
                "plugin",
                "install",
                "akismet",
                "--path=/site/wordpress",
                "--activate",
                "--debug"
            ]
        );
    }

    #[test]
    fn db_export_disables_extended_insert() {
        let cmd = WpCommand::DbExport(DbExport {
            path: wp(),
            dump_path: PathBuf::from("/site/database/core.sql"),
            debug: false,
        });
        assert!(cmd.to_args().contains(&"--extended-insert=false".to_string()));
    }

    #[test]
    fn eval_date_builds_php() {
        let cmd = WpCommand::Eval(Eval::date(wp(), "Y.m.d-His", false));
        assert_eq!(
            cmd.to_args(),
            vec![
                "eval",
                "echo date('Y.m.d-His');",
                "--path=/site/wordpress",
                "--skip-wordpress"
            ]
        );
    }

    #[test]
    fn display_masks_passwords() {
        let cmd = WpCommand::CoreInstall(CoreInstall {
            path: wp(),
            url: "https://example.com".into(),
            title: "Site".into(),
            admin_user: "admin".into(),
            admin_email: "admin@example.com".into(),
            admin_password: Some("hunter2".into()),
            skip_email: true,
            debug: false,
        });
        let shown = cmd.to_string();
        assert!(shown.starts_with("wp core install"));
        assert!(!shown.contains("hunter2"));
        assert!(cmd.to_args().contains(&"--admin_password=hunter2".to_string()));
    }

    #[test]
    fn validation_rejects_empty_required_fields() {
        let cmd = WpCommand::OptionUpdate(OptionUpdate {
            path: wp(),
            name: " ".into(),
            value: "x".into(),
            autoload: None,
            debug: false,
        });
        assert!(matches!(
            cmd.validate(),
            Err(DomainError::InvalidCommand {
                command: "option update",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_sql_injection() {
        let cmd = WpCommand::DbCreateUser(DbCreateUser {
            path: wp(),
            admin: None,
            user_name: "x'; DROP DATABASE wp; --".into(),
            user_password: "pw".into(),
            host: "localhost".into(),
            debug: false,
        });
        assert!(cmd.validate().is_err());

        let grant = WpCommand::DbGrant(DbGrant {
            path: wp(),
            admin: None,
            privileges: "SELECT, INSERT".into(),
            schema: "wp_site".into(),
            user_name: "site".into(),
            host: "%".into(),
            debug: false,
        });
        assert!(grant.validate().is_ok());
        assert_eq!(
            grant.to_args().last().map(String::as_str),
            Some("GRANT SELECT, INSERT ON wp_site.* TO 'site'@'%'")
        );
    }

    #[test]
    fn post_delete_rejects_odd_post_types() {
        let cmd = WpCommand::PostDeleteByType(PostDeleteByType {
            path: wp(),
            post_type: "page'];".into(),
            debug: false,
        });
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn command_output_success_requires_zero_exit() {
        assert!(CommandOutput::ok("done").success());
        let killed = CommandOutput {
            exit_code: None,
            ..CommandOutput::default()
        };
        assert!(!killed.success());
    }
}
