//! `wp-config.php` generation and the CloudFront snippet.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument};

use crate::{
    application::{
        ports::{Filesystem, Reporter},
        services::executor::CommandExecutor,
    },
    domain::{ConfigCreate, ConfigSet, Environment, Message, WpCommand},
    error::PresswrightResult,
};

pub const WP_CONFIG_FILE: &str = "wp-config.php";
pub const CLOUDFRONT_SNIPPET_FILE: &str = "default-cloudfront-forwarded-proto.php";

/// `/**` doc block immediately followed by the `require_once` line that
/// loads `wp-settings.php`.
static CLOUDFRONT_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*\*.*\nrequire_once.*").expect("anchor pattern is a valid regex")
});

pub struct ConfigFileWriter {
    executor: CommandExecutor,
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
    snippets_dir: PathBuf,
}

impl ConfigFileWriter {
    pub fn new(
        executor: CommandExecutor,
        filesystem: Arc<dyn Filesystem>,
        reporter: Arc<dyn Reporter>,
        snippets_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            filesystem,
            reporter,
            snippets_dir: snippets_dir.into(),
        }
    }

    /// `config create` with the environment's credentials, then one
    /// `config set` per `wp_config` entry in declaration order.
    ///
    /// Returns the number of entries applied.
    #[instrument(skip_all, fields(environment = %environment.name))]
    pub fn create_configuration_file(
        &self,
        environment: &Environment,
        wordpress_path: &Path,
        db_password: Option<&str>,
    ) -> PresswrightResult<usize> {
        let credentials = environment.credentials()?;
        let debug = environment.wp_cli_debug;

        self.executor.execute(WpCommand::ConfigCreate(ConfigCreate {
            path: wordpress_path.to_path_buf(),
            db_host: credentials.host,
            db_name: credentials.name,
            db_user: credentials.user,
            db_pass: db_password.map(str::to_string),
            db_prefix: credentials.prefix,
            db_charset: credentials.charset,
            db_collate: credentials.collate,
            skip_check: credentials.skip_check,
            force: true,
            debug,
        }))?;

        for (name, entry) in environment.wp_config.iter() {
            self.executor.execute(WpCommand::ConfigSet(ConfigSet {
                path: wordpress_path.to_path_buf(),
                name: name.to_string(),
                value: entry.value_string(),
                kind: entry.kind,
                raw: entry.is_raw(),
                debug,
            }))?;
        }

        debug!(entries = environment.wp_config.len(), "wp-config.php written");
        Ok(environment.wp_config.len())
    }

    /// Insert the CloudFront forwarded-proto snippet just before the
    /// `require_once` block of `wp-config.php`.
    ///
    /// Returns whether the file was rewritten. A missing config file, a
    /// missing anchor or a missing snippet template all leave it untouched.
    #[instrument(skip(self), fields(path = %wordpress_path.display()))]
    pub fn add_cloudfront_forwarded_proto_snippet(
        &self,
        wordpress_path: &Path,
    ) -> PresswrightResult<bool> {
        let config_path = wordpress_path.join(WP_CONFIG_FILE);
        if !self.filesystem.exists(&config_path) {
            self.reporter
                .info(&Message::ConfigFileMissing { path: config_path });
            return Ok(false);
        }

        let content = self.filesystem.read_to_string(&config_path)?;
        let Some(anchor) = CLOUDFRONT_ANCHOR.find(&content) else {
            self.reporter
                .warning(&Message::CloudfrontAnchorMissing { path: config_path });
            return Ok(false);
        };

        let snippet_path = self.snippets_dir.join(CLOUDFRONT_SNIPPET_FILE);
        if !self.filesystem.exists(&snippet_path) {
            self.reporter
                .error(&Message::FileNotFound { path: snippet_path });
            return Ok(false);
        }
        let snippet = self.filesystem.read_to_string(&snippet_path)?;

        let mut updated = String::with_capacity(content.len() + snippet.len() + 1);
        updated.push_str(&content[..anchor.start()]);
        updated.push_str(snippet.trim_end_matches('\n'));
        updated.push('\n');
        updated.push_str(&content[anchor.start()..]);

        self.filesystem.write_file(&config_path, &updated)?;
        self.reporter
            .info(&Message::CloudfrontSnippetAdded { path: config_path });
        Ok(true)
    }
}
