//! Plugin and theme installation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{Filesystem, Reporter},
        services::executor::CommandExecutor,
    },
    domain::{
        Constants, DomainError, Environment, Message, Plugin, PluginInstall, PluginSource, SiteConfiguration,
        Theme, ThemeInstall, ThemeSourceType, WpCommand,
    },
    error::PresswrightResult,
};

/// Constants key of the `.gitignore` pattern whose first group is the theme slug.
pub const GITIGNORE_THEME_REGEX: &str = "wordpress-theme";

pub struct PluginInstaller {
    executor: CommandExecutor,
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
}

impl PluginInstaller {
    pub fn new(
        executor: CommandExecutor,
        filesystem: Arc<dyn Filesystem>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            executor,
            filesystem,
            reporter,
        }
    }

    /// Install every declared plugin, in declaration order, one call each.
    ///
    /// Returns the number of install calls issued.
    #[instrument(skip_all, fields(environment = %environment.name))]
    pub fn install_all(
        &self,
        site_config: &SiteConfiguration,
        environment: &Environment,
        constants: &Constants,
        root_path: &Path,
        debug: bool,
    ) -> PresswrightResult<usize> {
        let plugins = &site_config.settings.plugins;
        if plugins.is_empty() {
            self.reporter.info(&Message::NoPlugins);
            return Ok(0);
        }

        let wordpress_path = constants.wordpress_path(root_path);
        let plugins_path = constants.plugins_path(root_path);

        for plugin in plugins {
            let archive = match plugin.source {
                PluginSource::Url(_) => None,
                _ => {
                    let found = self.file_path_from_pattern(&plugins_path, &plugin.zip_pattern())?;
                    if found.is_none() && plugin.source == PluginSource::Zip {
                        self.reporter.warning(&Message::PluginArchiveNotFound {
                            name: plugin.name.clone(),
                            pattern: plugin.zip_pattern(),
                        });
                    }
                    found
                }
            };
            self.install_plugin(
                plugin,
                &wordpress_path,
                plugin.activate,
                plugin.force,
                archive.as_deref(),
                debug,
            )?;
        }

        info!(count = plugins.len(), "Plugins installed");
        Ok(plugins.len())
    }

    /// One `wp plugin install` call.
    ///
    /// The archive path wins when present, then a declared URL, then the
    /// plugin name as a registry slug. A zip plugin whose archive was not
    /// found falls back to its name and wp-cli reports the real error.
    pub fn install_plugin(
        &self,
        plugin: &Plugin,
        wordpress_path: &Path,
        activate: bool,
        force: bool,
        archive: Option<&Path>,
        debug: bool,
    ) -> PresswrightResult<()> {
        let source = match (archive, &plugin.source) {
            (Some(path), _) => path.display().to_string(),
            (None, PluginSource::Url(url)) => url.clone(),
            (None, _) => plugin.name.clone(),
        };
        self.reporter.info(&Message::PluginInstalling {
            name: plugin.name.clone(),
            source: source.clone(),
        });
        self.executor.execute(WpCommand::PluginInstall(PluginInstall {
            path: wordpress_path.to_path_buf(),
            name: plugin.name.clone(),
            source,
            activate,
            force,
            debug,
        }))?;
        Ok(())
    }

    /// Install and activate the declared theme, if any.
    #[instrument(skip_all)]
    pub fn install_theme(
        &self,
        theme: Option<&Theme>,
        constants: &Constants,
        root_path: &Path,
        debug: bool,
    ) -> PresswrightResult<bool> {
        let Some(theme) = theme else {
            return Ok(false);
        };

        let source = match theme.source_type {
            ThemeSourceType::Wordpress | ThemeSourceType::Url => theme.source.clone(),
            ThemeSourceType::Zip => self
                .file_path_from_pattern(&constants.themes_path(root_path), &theme.zip_pattern())?
                .map_or_else(|| theme.source.clone(), |p| p.display().to_string()),
        };

        self.executor.execute(WpCommand::ThemeInstall(ThemeInstall {
            path: constants.wordpress_path(root_path),
            source,
            activate: true,
            force: false,
            debug,
        }))?;

        if theme.source_type != ThemeSourceType::Url {
            self.update_gitignore_theme(root_path, constants, &theme.source)?;
        }
        Ok(true)
    }

    /// Rewrite the theme directory named in the project's `.gitignore`.
    ///
    /// Every match of the `wordpress-theme` regex has its first capture
    /// group replaced by `theme_name`. Nothing happens when the constants
    /// carry no such regex or the project has no `.gitignore`.
    pub fn update_gitignore_theme(
        &self,
        root_path: &Path,
        constants: &Constants,
        theme_name: &str,
    ) -> PresswrightResult<bool> {
        let Some(pattern) = constants.regex(GITIGNORE_THEME_REGEX)? else {
            return Ok(false);
        };
        let gitignore = root_path.join(".gitignore");
        if !self.filesystem.exists(&gitignore) {
            return Ok(false);
        }
        let regex = Regex::new(&pattern).map_err(|e| {
            DomainError::InvalidConfiguration(format!(
                "regex '{GITIGNORE_THEME_REGEX}' does not compile: {e}"
            ))
        })?;

        let content = self.filesystem.read_to_string(&gitignore)?;
        let updated = replace_first_group(&regex, &content, theme_name);
        if updated == content {
            return Ok(false);
        }
        self.filesystem.write_file(&gitignore, &updated)?;
        self.reporter.info(&Message::GitignoreThemeUpdated {
            path: gitignore,
            theme: theme_name.to_owned(),
        });
        Ok(true)
    }

    /// The single file below `dir` matching `pattern`; `None` for zero or
    /// several matches, or when `dir` does not exist.
    pub fn file_path_from_pattern(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> PresswrightResult<Option<PathBuf>> {
        if !self.filesystem.is_dir(dir) {
            return Ok(None);
        }
        let mut matches = self.filesystem.find_files(dir, pattern)?;
        debug!(pattern, matches = matches.len(), "Archive lookup");
        Ok(if matches.len() == 1 { matches.pop() } else { None })
    }
}

fn replace_first_group(regex: &Regex, haystack: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    for group in regex.captures_iter(haystack).filter_map(|caps| caps.get(1)) {
        out.push_str(&haystack[cursor..group.start()]);
        out.push_str(replacement);
        cursor = group.end();
    }
    out.push_str(&haystack[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::*;

    use super::*;
    use crate::application::ports::{MockFilesystem, MockReporter, MockWpCli};
    use crate::domain::{CommandOutput, FailurePolicy};

    fn site(plugins: &str) -> SiteConfiguration {
        serde_json::from_str(&format!(
            r#"{{
                "settings": {{"title": "T", "admin": {{"user": "a", "email": "a@example.com"}}, "plugins": {plugins}}},
                "environments": [{{"name": "localhost", "base_url": "http://localhost", "wp_cli_debug": true}}]
            }}"#
        ))
        .unwrap()
    }

    fn constants() -> Constants {
        serde_json::from_str(
            r#"{"paths": {"wordpress": "/wordpress", "content": {"plugins": "/content/plugins", "themes": "/content/themes"}}}"#,
        )
        .unwrap()
    }

    fn quiet_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_info().return_const(());
        reporter.expect_warning().return_const(());
        reporter
    }

    fn installer(wp: MockWpCli, fs: MockFilesystem, reporter: MockReporter) -> PluginInstaller {
        let reporter: Arc<dyn Reporter> = Arc::new(reporter);
        PluginInstaller::new(
            CommandExecutor::new(Arc::new(wp), reporter.clone(), FailurePolicy::Continue),
            Arc::new(fs),
            reporter,
        )
    }

    #[test]
    fn no_plugins_means_no_calls() {
        let mut wp = MockWpCli::new();
        wp.expect_run().never();
        let mut reporter = MockReporter::new();
        reporter
            .expect_info()
            .withf(|m| *m == Message::NoPlugins)
            .times(1)
            .return_const(());
        let config = site("[]");
        let sut = installer(wp, MockFilesystem::new(), reporter);

        let count = sut
            .install_all(&config, &config.environments[0], &constants(), Path::new("/site"), true)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn url_plugin_installs_once_with_its_flags() {
        let config = site(
            r#"[{"name": "akismet", "source": "url:https://downloads.example.com/akismet.zip", "activate": true, "force": false}]"#,
        );
        let expected = WpCommand::PluginInstall(PluginInstall {
            path: PathBuf::from("/site/wordpress"),
            name: "akismet".into(),
            source: "https://downloads.example.com/akismet.zip".into(),
            activate: true,
            force: false,
            debug: true,
        });
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .with(eq(expected))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("Success")));
        let mut fs = MockFilesystem::new();
        fs.expect_find_files().never();
        let sut = installer(wp, fs, quiet_reporter());

        let debug = config.environments[0].wp_cli_debug;
        sut.install_all(&config, &config.environments[0], &constants(), Path::new("/site"), debug)
            .unwrap();
    }

    #[test]
    fn zip_plugins_resolve_archives_in_declaration_order() {
        let config = site(
            r#"[{"name": "first", "source": "zip", "activate": true, "force": true},
                {"name": "second", "source": "zip", "activate": false, "force": false}]"#,
        );
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_find_files()
            .with(eq(Path::new("/site/content/plugins")), eq("first*.zip"))
            .returning(|_, _| Ok(vec![PathBuf::from("/site/content/plugins/first-1.0.zip")]));
        fs.expect_find_files()
            .with(eq(Path::new("/site/content/plugins")), eq("second*.zip"))
            .returning(|_, _| {
                Ok(vec![
                    PathBuf::from("/site/content/plugins/second-1.zip"),
                    PathBuf::from("/site/content/plugins/second-2.zip"),
                ])
            });

        let mut seq = Sequence::new();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::PluginInstall(p) if p.source == "/site/content/plugins/first-1.0.zip" && p.force))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("")));
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::PluginInstall(p) if p.source == "second" && !p.activate))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("")));

        let mut reporter = MockReporter::new();
        reporter.expect_info().return_const(());
        reporter
            .expect_warning()
            .withf(|m| matches!(m, Message::PluginArchiveNotFound { name, .. } if name == "second"))
            .times(1)
            .return_const(());
        let sut = installer(wp, fs, reporter);

        let count = sut
            .install_all(&config, &config.environments[0], &constants(), Path::new("/site"), false)
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn missing_plugins_dir_falls_back_to_slug() {
        let config = site(r#"[{"name": "hello-dolly", "activate": true}]"#);
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_find_files().never();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::PluginInstall(p) if p.source == "hello-dolly"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        let sut = installer(wp, fs, quiet_reporter());

        sut.install_all(&config, &config.environments[0], &constants(), Path::new("/site"), false)
            .unwrap();
    }

    #[test]
    fn theme_is_installed_and_activated() {
        let theme = Theme {
            source_type: ThemeSourceType::Wordpress,
            source: "twentytwenty".into(),
            has_child: false,
        };
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| matches!(c, WpCommand::ThemeInstall(t) if t.source == "twentytwenty" && t.activate))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        let sut = installer(wp, MockFilesystem::new(), quiet_reporter());

        assert!(sut
            .install_theme(Some(&theme), &constants(), Path::new("/site"), false)
            .unwrap());
        assert!(!sut
            .install_theme(None, &constants(), Path::new("/site"), false)
            .unwrap());
    }

    fn constants_with_theme_regex() -> Constants {
        // wordpress/wp-content/themes/([\w\-]+)/
        serde_json::from_str(
            r#"{"paths": {"wordpress": "/wordpress", "content": {"plugins": "/content/plugins", "themes": "/content/themes"}},
                "regex_base64": [{"key": "wordpress-theme", "value": "d29yZHByZXNzL3dwLWNvbnRlbnQvdGhlbWVzLyhbXHdcLV0rKS8="}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn gitignore_theme_entry_is_rewritten() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(Path::new("/site/.gitignore")))
            .return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok("vendor/\nwordpress/wp-content/themes/oldtheme/\n".into()));
        fs.expect_write_file()
            .with(
                eq(Path::new("/site/.gitignore")),
                eq("vendor/\nwordpress/wp-content/themes/mytheme/\n"),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        let mut reporter = MockReporter::new();
        reporter
            .expect_info()
            .withf(|m| matches!(m, Message::GitignoreThemeUpdated { theme, .. } if theme == "mytheme"))
            .times(1)
            .return_const(());
        let sut = installer(MockWpCli::new(), fs, reporter);

        assert!(sut
            .update_gitignore_theme(Path::new("/site"), &constants_with_theme_regex(), "mytheme")
            .unwrap());
    }

    #[test]
    fn gitignore_is_left_alone_without_regex_or_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_write_file().never();
        let sut = installer(MockWpCli::new(), fs, quiet_reporter());

        assert!(!sut
            .update_gitignore_theme(Path::new("/site"), &constants(), "mytheme")
            .unwrap());
        assert!(!sut
            .update_gitignore_theme(Path::new("/site"), &constants_with_theme_regex(), "mytheme")
            .unwrap());
    }

    #[test]
    fn url_theme_does_not_touch_gitignore() {
        let theme = Theme {
            source_type: ThemeSourceType::Url,
            source: "https://downloads.example.com/theme.zip".into(),
            has_child: false,
        };
        let mut wp = MockWpCli::new();
        wp.expect_run().returning(|_| Ok(CommandOutput::ok("")));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        let sut = installer(wp, fs, quiet_reporter());

        assert!(sut
            .install_theme(Some(&theme), &constants_with_theme_regex(), Path::new("/site"), false)
            .unwrap());
    }
}
