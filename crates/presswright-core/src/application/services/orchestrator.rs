//! Provisioning pipeline.
//!
//! Drives one environment from an empty directory to an exported database
//! snapshot, one [`ProvisioningStage`] at a time. Stages only move forward and
//! there is no rollback: a hard error stops the run and leaves the site as it
//! is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem, Reporter, WpCli},
        services::{
            config_file_writer::ConfigFileWriter,
            content_importer::ContentImporter,
            database_manager::{DatabaseManager, DatabaseUser},
            environment_resolver::EnvironmentResolver,
            executor::CommandExecutor,
            plugin_installer::PluginInstaller,
            token_converter::TokenConverter,
            wp_cli_installer::{DEFAULT_WP_CLI_URL, WpCliInstaller},
        },
    },
    domain::{
        Constants, CoreDownload, CoreInstall, DbAdmin, Environment, FailurePolicy, Message,
        ProvisioningStage, SiteConfiguration, WpCommand,
    },
    error::PresswrightResult,
};

const GITKEEP: &str = ".gitkeep";

/// Driven-side adapters the orchestrator works through.
#[derive(Clone)]
pub struct Ports {
    pub wp_cli: Arc<dyn WpCli>,
    pub filesystem: Arc<dyn Filesystem>,
    pub downloader: Arc<dyn Downloader>,
    pub reporter: Arc<dyn Reporter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningSettings {
    pub policy: FailurePolicy,
    /// Directory holding `default-cloudfront-forwarded-proto.php`.
    pub snippets_dir: PathBuf,
    pub wp_cli_download_url: String,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::default(),
            snippets_dir: PathBuf::from("default-files"),
            wp_cli_download_url: DEFAULT_WP_CLI_URL.to_string(),
        }
    }
}

/// One provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub environment_name: String,
    /// Site repository root; every `constants.paths` entry is relative to it.
    pub root_path: PathBuf,
    pub admin_password: Option<String>,
    pub db_password: Option<String>,
    /// Reset the existing database instead of creating it.
    pub reprovision: bool,
    /// Privileged account for `db create` and user creation.
    pub db_admin: Option<DbAdmin>,
    /// Host part of the created database user. Only used with `db_admin`.
    pub db_user_host: String,
}

impl ProvisionRequest {
    pub fn new(environment_name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            environment_name: environment_name.into(),
            root_path: root_path.into(),
            admin_password: None,
            db_password: None,
            reprovision: false,
            db_admin: None,
            db_user_host: "localhost".into(),
        }
    }
}

/// What a run got through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub environment: String,
    pub completed: Vec<ProvisioningStage>,
    pub dump_path: Option<PathBuf>,
    pub wp_config_entries: usize,
    pub cloudfront_applied: bool,
    pub theme_installed: bool,
    pub plugins_installed: usize,
    pub content_types_imported: usize,
    pub gitkeep_purged: usize,
}

impl ProvisionReport {
    pub fn last_stage(&self) -> Option<ProvisioningStage> {
        self.completed.last().copied()
    }
}

type StageObserver = Box<dyn Fn(ProvisioningStage) + Send + Sync>;

pub struct ProvisioningOrchestrator {
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
    executor: CommandExecutor,
    resolver: EnvironmentResolver,
    tokens: TokenConverter,
    database: DatabaseManager,
    config_writer: ConfigFileWriter,
    plugins: PluginInstaller,
    content: ContentImporter,
    wp_cli_installer: WpCliInstaller,
    on_stage: Option<StageObserver>,
}

impl ProvisioningOrchestrator {
    /// Wire every service around a single [`CommandExecutor`].
    pub fn new(ports: Ports, settings: ProvisioningSettings) -> Self {
        let executor = CommandExecutor::new(
            ports.wp_cli.clone(),
            ports.reporter.clone(),
            settings.policy,
        );
        Self {
            resolver: EnvironmentResolver::new(ports.reporter.clone()),
            tokens: TokenConverter::new(executor.clone()),
            database: DatabaseManager::new(executor.clone()),
            config_writer: ConfigFileWriter::new(
                executor.clone(),
                ports.filesystem.clone(),
                ports.reporter.clone(),
                settings.snippets_dir,
            ),
            plugins: PluginInstaller::new(
                executor.clone(),
                ports.filesystem.clone(),
                ports.reporter.clone(),
            ),
            content: ContentImporter::new(executor.clone(), ports.reporter.clone()),
            wp_cli_installer: WpCliInstaller::new(
                executor.clone(),
                ports.downloader.clone(),
                ports.filesystem.clone(),
                ports.reporter.clone(),
            )
            .with_download_url(settings.wp_cli_download_url),
            filesystem: ports.filesystem,
            reporter: ports.reporter,
            executor,
            on_stage: None,
        }
    }

    /// Called after each stage completes, e.g. to drive a progress bar.
    pub fn with_stage_observer(
        mut self,
        observer: impl Fn(ProvisioningStage) + Send + Sync + 'static,
    ) -> Self {
        self.on_stage = Some(Box::new(observer));
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.executor.policy()
    }

    pub fn resolver(&self) -> &EnvironmentResolver {
        &self.resolver
    }

    pub fn wp_cli_installer(&self) -> &WpCliInstaller {
        &self.wp_cli_installer
    }

    /// Run the whole pipeline for `request.environment_name`.
    #[instrument(skip_all, fields(environment = %request.environment_name))]
    pub fn provision(
        &self,
        site_config: &SiteConfiguration,
        constants: &Constants,
        request: &ProvisionRequest,
    ) -> PresswrightResult<ProvisionReport> {
        self.reporter.info(&Message::ProvisioningStarted {
            environment: request.environment_name.clone(),
        });

        let environment = self
            .resolver
            .resolve(site_config, &request.environment_name)?;
        let root = request.root_path.as_path();
        let wordpress_path = constants.wordpress_path(root);
        let debug = site_config.wp_cli_debug(&environment);

        let mut report = ProvisionReport {
            environment: environment.name.clone(),
            ..ProvisionReport::default()
        };

        report.gitkeep_purged += self.download_wordpress(site_config, &wordpress_path, debug)?;
        self.complete(&mut report, ProvisioningStage::Downloaded);

        self.prepare_database(&environment, &wordpress_path, request, debug)?;
        self.complete(&mut report, ProvisioningStage::DatabaseReady);

        let environment = self.convert_wp_config_tokens(environment, &wordpress_path, debug)?;
        report.wp_config_entries = self.config_writer.create_configuration_file(
            &environment,
            &wordpress_path,
            request.db_password.as_deref(),
        )?;
        if site_config.settings.aws_cloudfront {
            report.cloudfront_applied = self
                .config_writer
                .add_cloudfront_forwarded_proto_snippet(&wordpress_path)?;
        }
        self.complete(&mut report, ProvisioningStage::ConfigWritten);

        self.install_wordpress_core(
            site_config,
            &environment,
            &wordpress_path,
            request.admin_password.as_deref(),
            debug,
        )?;
        self.complete(&mut report, ProvisioningStage::CoreInstalled);

        self.apply_options(site_config, &wordpress_path, debug)?;
        self.complete(&mut report, ProvisioningStage::OptionsApplied);

        report.theme_installed =
            self.plugins
                .install_theme(site_config.themes.as_ref(), constants, root, debug)?;
        report.plugins_installed =
            self.plugins
                .install_all(site_config, &environment, constants, root, debug)?;
        self.complete(&mut report, ProvisioningStage::PluginsInstalled);

        report.content_types_imported =
            self.content
                .import_all(site_config, &environment, root, constants)?;
        self.complete(&mut report, ProvisioningStage::ContentImported);

        let dump_path = self.dump_path(site_config, constants, root, debug)?;
        self.database.delete_transient(&wordpress_path, true, debug)?;
        self.export_database(&wordpress_path, &dump_path, debug)?;
        report.dump_path = Some(dump_path);
        report.gitkeep_purged += self.purge_content_gitkeep(constants, root)?;
        self.complete(&mut report, ProvisioningStage::DatabaseExported);

        self.reporter.info(&Message::ProvisioningFinished {
            environment: report.environment.clone(),
        });
        Ok(report)
    }

    /// Install core on an already downloaded and configured tree, set the
    /// tagline and snapshot the database.
    ///
    /// On re-provision the database is reset first. Content directories are
    /// cleared of `.gitkeep` placeholders at the end.
    #[instrument(skip_all, fields(environment = %environment.name))]
    pub fn install_wordpress_site(
        &self,
        site_config: &SiteConfiguration,
        environment: &Environment,
        constants: &Constants,
        request: &ProvisionRequest,
    ) -> PresswrightResult<ProvisionReport> {
        let root = request.root_path.as_path();
        let wordpress_path = constants.wordpress_path(root);
        let debug = site_config.wp_cli_debug(environment);
        let mut report = ProvisionReport {
            environment: environment.name.clone(),
            ..ProvisionReport::default()
        };

        if request.reprovision {
            self.database.reset(&wordpress_path, debug)?;
        }

        let environment =
            self.convert_wp_config_tokens(environment.clone(), &wordpress_path, debug)?;
        self.install_wordpress_core(
            site_config,
            &environment,
            &wordpress_path,
            request.admin_password.as_deref(),
            debug,
        )?;
        self.complete(&mut report, ProvisioningStage::CoreInstalled);

        self.database.update_option(
            "blogdescription",
            &site_config.settings.description,
            None,
            &wordpress_path,
            debug,
        )?;
        self.complete(&mut report, ProvisioningStage::OptionsApplied);

        let dump_path = self.dump_path(site_config, constants, root, debug)?;
        self.export_database(&wordpress_path, &dump_path, debug)?;
        report.dump_path = Some(dump_path);
        report.gitkeep_purged = self.purge_content_gitkeep(constants, root)?;
        self.complete(&mut report, ProvisioningStage::DatabaseExported);

        Ok(report)
    }

    /// `core download` into `wordpress_path`, then drop the `.gitkeep`
    /// placeholders it shipped with.
    ///
    /// Returns the number of placeholders removed.
    #[instrument(skip(self, site_config, debug))]
    pub fn download_wordpress(
        &self,
        site_config: &SiteConfiguration,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<usize> {
        if !self.filesystem.is_dir(wordpress_path) {
            return Err(ApplicationError::NotFound {
                path: wordpress_path.to_path_buf(),
            }
            .into());
        }

        let settings = &site_config.settings;
        self.executor.execute(WpCommand::CoreDownload(CoreDownload {
            path: wordpress_path.to_path_buf(),
            version: settings.version.clone(),
            locale: settings.locale.clone(),
            skip_content: settings.skip_content_download,
            debug,
        }))?;

        self.purge_gitkeep(wordpress_path)
    }

    /// `core install` for the environment's URL and the site's admin.
    pub fn install_wordpress_core(
        &self,
        site_config: &SiteConfiguration,
        environment: &Environment,
        wordpress_path: &Path,
        admin_password: Option<&str>,
        debug: bool,
    ) -> PresswrightResult<()> {
        let settings = &site_config.settings;
        self.executor.execute(WpCommand::CoreInstall(CoreInstall {
            path: wordpress_path.to_path_buf(),
            url: environment.base_url.clone(),
            title: settings.title.clone(),
            admin_user: settings.admin.user.clone(),
            admin_email: settings.admin.email.clone(),
            admin_password: admin_password.map(str::to_string),
            skip_email: settings.admin.skip_email,
            debug,
        }))?;
        Ok(())
    }

    /// Remove every `.gitkeep` below `dir`. A missing directory is a no-op.
    pub fn purge_gitkeep(&self, dir: &Path) -> PresswrightResult<usize> {
        if !self.filesystem.is_dir(dir) {
            return Ok(0);
        }
        let placeholders = self.filesystem.find_files(dir, GITKEEP)?;
        for file in &placeholders {
            self.filesystem.remove_file(file)?;
        }
        if !placeholders.is_empty() {
            self.reporter.info(&Message::GitkeepPurged {
                count: placeholders.len(),
                path: dir.to_path_buf(),
            });
        }
        Ok(placeholders.len())
    }

    pub fn export_database(
        &self,
        wordpress_path: &Path,
        dump_path: &Path,
        debug: bool,
    ) -> PresswrightResult<()> {
        let output = self.database.export(wordpress_path, dump_path, debug)?;
        if output.success() {
            self.reporter.info(&Message::DatabaseExported {
                path: dump_path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Snapshot location: `constants.paths.database` joined with the
    /// token-converted `database.dumps.core` name.
    pub fn dump_path(
        &self,
        site_config: &SiteConfiguration,
        constants: &Constants,
        root_path: &Path,
        debug: bool,
    ) -> PresswrightResult<PathBuf> {
        let wordpress_path = constants.wordpress_path(root_path);
        let file_name =
            self.tokens
                .convert_token(&site_config.database.dumps.core, &wordpress_path, debug)?;
        Ok(constants.database_path(root_path).join(file_name))
    }

    fn prepare_database(
        &self,
        environment: &Environment,
        wordpress_path: &Path,
        request: &ProvisionRequest,
        debug: bool,
    ) -> PresswrightResult<()> {
        if request.reprovision {
            self.database.reset(wordpress_path, debug)?;
            return Ok(());
        }

        let admin = request.db_admin.as_ref();
        self.database.create(wordpress_path, admin, debug)?;

        if admin.is_some() {
            let credentials = environment.credentials()?;
            let user = DatabaseUser {
                name: credentials.user,
                password: request.db_password.clone().unwrap_or_default(),
                host: request.db_user_host.clone(),
                privileges: "ALL PRIVILEGES".into(),
                schema: credentials.name,
            };
            self.database
                .create_user_and_grant(wordpress_path, admin, &user, debug)?;
        }
        Ok(())
    }

    /// Resolve tokens in every string `wp_config` value.
    fn convert_wp_config_tokens(
        &self,
        mut environment: Environment,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<Environment> {
        for (name, entry) in environment.wp_config.iter_mut() {
            let Some(value) = entry.value.as_str() else {
                continue;
            };
            let converted = self.tokens.convert_token(value, wordpress_path, debug)?;
            if converted != value {
                debug!(name, %converted, "wp_config token resolved");
                entry.value = converted.into();
            }
        }
        Ok(environment)
    }

    fn apply_options(
        &self,
        site_config: &SiteConfiguration,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<()> {
        self.database.update_option(
            "blogdescription",
            &site_config.settings.description,
            None,
            wordpress_path,
            debug,
        )?;
        for option in &site_config.settings.options {
            self.database.update_option(
                &option.name,
                &option.value_string(),
                option.autoload,
                wordpress_path,
                debug,
            )?;
        }
        Ok(())
    }

    fn purge_content_gitkeep(&self, constants: &Constants, root: &Path) -> PresswrightResult<usize> {
        let mut purged = 0;
        for dir in [
            constants.themes_path(root),
            constants.plugins_path(root),
            constants.wxr_path(root),
        ] {
            purged += self.purge_gitkeep(&dir)?;
        }
        Ok(purged)
    }

    fn complete(&self, report: &mut ProvisionReport, stage: ProvisioningStage) {
        info!(stage = stage.as_str(), "Stage completed");
        report.completed.push(stage);
        self.reporter.info(&Message::StageCompleted(stage));
        if let Some(observer) = &self.on_stage {
            observer(stage);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::Sequence;
    use mockall::predicate::*;

    use super::*;
    use crate::application::ports::{MockDownloader, MockFilesystem, MockReporter, MockWpCli};
    use crate::domain::{CommandOutput, DomainError};
    use crate::error::PresswrightError;

    const SITE: &str = r#"{
        "database": {"name": "wp", "user": "wp_user", "dumps": {"core": "[date|Y.m.d]-db.core.sql"}},
        "settings": {
            "title": "Example",
            "description": "Just another site",
            "admin": {"user": "admin", "email": "admin@example.com", "skip_email": true},
            "options": [{"name": "permalink_structure", "value": "/%postname%/"}],
            "plugins": [{"name": "akismet", "source": "https://downloads.wordpress.org/plugin/akismet.zip"}]
        },
        "content": {"sources": {"page": "pages.xml"}},
        "environments": [{
            "name": "localhost",
            "base_url": "http://localhost:8080",
            "wp_config": {"WP_DEBUG": {"value": true}}
        }]
    }"#;

    fn site() -> SiteConfiguration {
        serde_json::from_str(SITE).unwrap()
    }

    fn constants() -> Constants {
        serde_json::from_str(
            r#"{"paths": {"wordpress": "/wordpress", "database": "/database",
                "content": {"plugins": "/content/plugins", "themes": "/content/themes", "wxr": "/content/wxr"}}}"#,
        )
        .unwrap()
    }

    fn quiet_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_info().return_const(());
        reporter.expect_warning().return_const(());
        reporter.expect_error().return_const(());
        reporter
    }

    fn orchestrator(wp: MockWpCli, fs: MockFilesystem) -> ProvisioningOrchestrator {
        ProvisioningOrchestrator::new(
            Ports {
                wp_cli: Arc::new(wp),
                filesystem: Arc::new(fs),
                downloader: Arc::new(MockDownloader::new()),
                reporter: Arc::new(quiet_reporter()),
            },
            ProvisioningSettings::default(),
        )
    }

    fn empty_tree() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_find_files().returning(|_, _| Ok(Vec::new()));
        fs
    }

    fn ok(_: &WpCommand) -> PresswrightResult<CommandOutput> {
        Ok(CommandOutput::ok(""))
    }

    #[test]
    fn full_run_walks_every_stage_in_order() {
        let mut seq = Sequence::new();
        let mut wp = MockWpCli::new();
        let steps: Vec<fn(&WpCommand) -> bool> = vec![
            |c| matches!(c, WpCommand::CoreDownload(d) if d.version == "latest" && d.locale == "en_US"),
            |c| matches!(c, WpCommand::DbCreate(d) if d.admin.is_none()),
            |c| matches!(c, WpCommand::ConfigCreate(cc) if cc.db_name == "wp" && cc.db_user == "wp_user"),
            |c| matches!(c, WpCommand::ConfigSet(s) if s.name == "WP_DEBUG" && s.raw),
            |c| matches!(c, WpCommand::CoreInstall(i) if i.url == "http://localhost:8080" && i.skip_email),
            |c| matches!(c, WpCommand::OptionUpdate(o) if o.name == "blogdescription"),
            |c| matches!(c, WpCommand::OptionUpdate(o) if o.name == "permalink_structure"),
            |c| matches!(c, WpCommand::PluginInstall(p) if p.source.starts_with("https://")),
            |c| matches!(c, WpCommand::PostDeleteByType(p) if p.post_type == "page"),
            |c| matches!(c, WpCommand::ImportWxr(i) if i.file == Path::new("/site/content/wxr/pages.xml")),
        ];
        for step in steps {
            wp.expect_run()
                .withf(step)
                .times(1)
                .in_sequence(&mut seq)
                .returning(ok);
        }
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::Eval(e) if e.skip_wordpress))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("2024.01.31\n")));
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::TransientDelete(t) if t.all))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbExport(_)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);

        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();
        let report = orchestrator(wp, empty_tree())
            .with_stage_observer(move |stage| sink.lock().unwrap().push(stage))
            .provision(&site(), &constants(), &ProvisionRequest::new("localhost", "/site"))
            .unwrap();

        assert_eq!(report.completed, ProvisioningStage::ALL.to_vec());
        assert_eq!(*observed.lock().unwrap(), ProvisioningStage::ALL.to_vec());
        assert_eq!(
            report.dump_path.as_deref(),
            Some(Path::new("/site/database/2024.01.31-db.core.sql"))
        );
        assert_eq!(report.plugins_installed, 1);
        assert_eq!(report.content_types_imported, 1);
        assert!(!report.cloudfront_applied);
    }

    #[test]
    fn unknown_environment_stops_before_any_command() {
        let mut wp = MockWpCli::new();
        wp.expect_run().never();

        let err = orchestrator(wp, MockFilesystem::new())
            .provision(&site(), &constants(), &ProvisionRequest::new("staging", "/site"))
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Domain(DomainError::EnvironmentNotFound { .. })
        ));
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::CoreDownload(_)))
            .times(1)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbCreate(_)))
            .times(1)
            .returning(|_| {
                Ok(CommandOutput {
                    stdout: String::new(),
                    stderr: "Error: Access denied".into(),
                    exit_code: Some(1),
                })
            });

        let orchestrator = ProvisioningOrchestrator::new(
            Ports {
                wp_cli: Arc::new(wp),
                filesystem: Arc::new(empty_tree()),
                downloader: Arc::new(MockDownloader::new()),
                reporter: Arc::new(quiet_reporter()),
            },
            ProvisioningSettings {
                policy: FailurePolicy::Abort,
                ..ProvisioningSettings::default()
            },
        );
        let err = orchestrator
            .provision(&site(), &constants(), &ProvisionRequest::new("localhost", "/site"))
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Application(ApplicationError::ExternalToolFailed { .. })
        ));
    }

    #[test]
    fn download_requires_existing_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        let mut wp = MockWpCli::new();
        wp.expect_run().never();

        let err = orchestrator(wp, fs)
            .download_wordpress(&site(), Path::new("/site/wordpress"), false)
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Application(ApplicationError::NotFound { .. })
        ));
    }

    #[test]
    fn purge_gitkeep_removes_each_placeholder() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_find_files()
            .with(eq(Path::new("/site/wordpress")), eq(GITKEEP))
            .returning(|_, _| {
                Ok(vec![
                    PathBuf::from("/site/wordpress/wp-content/.gitkeep"),
                    PathBuf::from("/site/wordpress/wp-content/uploads/.gitkeep"),
                ])
            });
        fs.expect_remove_file().times(2).returning(|_| Ok(()));

        let purged = orchestrator(MockWpCli::new(), fs)
            .purge_gitkeep(Path::new("/site/wordpress"))
            .unwrap();
        assert_eq!(purged, 2);
    }

    #[test]
    fn reprovision_resets_instead_of_creating() {
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbCreate(_)))
            .never();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbReset(r) if r.yes))
            .times(1)
            .returning(ok);
        wp.expect_run()
            .withf(|c| !matches!(c, WpCommand::DbCreate(_) | WpCommand::DbReset(_) | WpCommand::Eval(_)))
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::Eval(_)))
            .returning(|_| Ok(CommandOutput::ok("2024.01.31")));

        let mut request = ProvisionRequest::new("localhost", "/site");
        request.reprovision = true;
        let report = orchestrator(wp, empty_tree())
            .provision(&site(), &constants(), &request)
            .unwrap();
        assert_eq!(report.last_stage(), Some(ProvisioningStage::DatabaseExported));
    }

    #[test]
    fn db_admin_creates_user_after_database() {
        let mut seq = Sequence::new();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbCreate(d) if d.admin.is_some()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbCreateUser(u) if u.user_name == "wp_user" && u.user_password == "pw"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbGrant(g) if g.schema == "wp"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);

        let mut request = ProvisionRequest::new("localhost", "/site");
        request.db_password = Some("pw".into());
        request.db_admin = Some(DbAdmin {
            user: "root".into(),
            password: "secret".into(),
        });
        let orchestrator = orchestrator(wp, MockFilesystem::new());
        let environment = orchestrator.resolver().resolve(&site(), "localhost").unwrap();
        orchestrator
            .prepare_database(&environment, Path::new("/site/wordpress"), &request, false)
            .unwrap();
    }

    #[test]
    fn install_wordpress_site_installs_describes_and_exports() {
        let mut seq = Sequence::new();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::CoreInstall(_)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::OptionUpdate(o) if o.value == "Just another site"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::Eval(_)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("2024.01.31")));
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::DbExport(e) if e.dump_path == Path::new("/site/database/2024.01.31-db.core.sql")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(ok);

        let orchestrator = orchestrator(wp, empty_tree());
        let environment = orchestrator.resolver().resolve(&site(), "localhost").unwrap();
        let report = orchestrator
            .install_wordpress_site(
                &site(),
                &environment,
                &constants(),
                &ProvisionRequest::new("localhost", "/site"),
            )
            .unwrap();
        assert_eq!(
            report.completed,
            vec![
                ProvisioningStage::CoreInstalled,
                ProvisioningStage::OptionsApplied,
                ProvisioningStage::DatabaseExported
            ]
        );
    }

    #[test]
    fn wp_config_tokens_are_resolved_before_writing() {
        let site: SiteConfiguration = serde_json::from_str(
            &SITE.replace(
                r#""WP_DEBUG": {"value": true}"#,
                r#""WP_CACHE_KEY_SALT": {"value": "site-[date|Ymd]"}"#,
            ),
        )
        .unwrap();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::Eval(_)))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("20240131")));

        let orchestrator = orchestrator(wp, MockFilesystem::new());
        let environment = orchestrator.resolver().resolve(&site, "localhost").unwrap();
        let converted = orchestrator
            .convert_wp_config_tokens(environment, Path::new("/site/wordpress"), false)
            .unwrap();
        assert_eq!(
            converted.wp_config.get("WP_CACHE_KEY_SALT").unwrap().value,
            serde_json::json!("site-20240131")
        );
    }
}
