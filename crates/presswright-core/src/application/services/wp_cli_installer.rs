//! Installs the wp-cli phar (and its Windows launcher).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem, Reporter},
        services::executor::CommandExecutor,
    },
    domain::{Message, WpCommand},
    error::PresswrightResult,
};

pub const DEFAULT_WP_CLI_URL: &str =
    "https://raw.githubusercontent.com/wp-cli/builds/gh-pages/phar/wp-cli.phar";
pub const WP_CLI_PHAR: &str = "wp-cli.phar";
pub const WP_CLI_BAT: &str = "wp.bat";

pub struct WpCliInstaller {
    executor: CommandExecutor,
    downloader: Arc<dyn Downloader>,
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
    download_url: String,
}

impl WpCliInstaller {
    pub fn new(
        executor: CommandExecutor,
        downloader: Arc<dyn Downloader>,
        filesystem: Arc<dyn Filesystem>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            executor,
            downloader,
            filesystem,
            reporter,
            download_url: DEFAULT_WP_CLI_URL.to_string(),
        }
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = url.into();
        self
    }

    /// Download `wp-cli.phar` into `install_dir`, make it executable, write
    /// the `wp.bat` launcher when asked to, then run `wp --info`.
    ///
    /// Returns the phar path.
    #[instrument(skip(self), fields(url = %self.download_url))]
    pub fn install_wp_cli(
        &self,
        install_dir: &Path,
        windows_launcher: bool,
    ) -> PresswrightResult<PathBuf> {
        if !self.filesystem.is_dir(install_dir) {
            return Err(ApplicationError::NotFound {
                path: install_dir.to_path_buf(),
            }
            .into());
        }

        let phar_path = install_dir.join(WP_CLI_PHAR);
        self.downloader.download(&self.download_url, &phar_path)?;
        self.filesystem.set_permissions(&phar_path, true)?;

        if windows_launcher {
            self.create_wp_cli_bat_file(&phar_path)?;
        }

        self.executor.execute(WpCommand::Info)?;
        info!(path = %phar_path.display(), "wp-cli installed");
        self.reporter.info(&Message::WpCliInstalled {
            path: phar_path.clone(),
        });
        Ok(phar_path)
    }

    /// Write `wp.bat` next to the phar so `wp` resolves on Windows.
    pub fn create_wp_cli_bat_file(&self, phar_path: &Path) -> PresswrightResult<PathBuf> {
        let bat_path = phar_path.with_file_name(WP_CLI_BAT);
        let content = format!("@ECHO OFF\nphp \"{}\" %*", phar_path.display());
        self.filesystem.write_file(&bat_path, &content)?;
        Ok(bat_path)
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::*;

    use super::*;
    use crate::application::ports::{MockDownloader, MockFilesystem, MockReporter, MockWpCli};
    use crate::domain::{CommandOutput, FailurePolicy};
    use crate::error::PresswrightError;

    fn installer(
        wp: MockWpCli,
        downloader: MockDownloader,
        fs: MockFilesystem,
    ) -> WpCliInstaller {
        let mut reporter = MockReporter::new();
        reporter.expect_info().return_const(());
        let reporter: Arc<dyn Reporter> = Arc::new(reporter);
        WpCliInstaller::new(
            CommandExecutor::new(Arc::new(wp), reporter.clone(), FailurePolicy::Continue),
            Arc::new(downloader),
            Arc::new(fs),
            reporter,
        )
    }

    #[test]
    fn rejects_missing_install_dir() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        let mut downloader = MockDownloader::new();
        downloader.expect_download().never();

        let err = installer(MockWpCli::new(), downloader, fs)
            .install_wp_cli(Path::new("/opt/wp-cli"), false)
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Application(ApplicationError::NotFound { .. })
        ));
    }

    #[test]
    fn downloads_chmods_then_checks_info() {
        let mut seq = Sequence::new();
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        let mut downloader = MockDownloader::new();
        downloader
            .expect_download()
            .with(eq(DEFAULT_WP_CLI_URL), eq(Path::new("/opt/wp-cli/wp-cli.phar")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        fs.expect_set_permissions()
            .with(eq(Path::new("/opt/wp-cli/wp-cli.phar")), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        fs.expect_write_file().never();
        let mut wp = MockWpCli::new();
        wp.expect_run()
            .with(eq(WpCommand::Info))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::ok("WP-CLI version: 2.4.0")));

        let phar = installer(wp, downloader, fs)
            .install_wp_cli(Path::new("/opt/wp-cli"), false)
            .unwrap();
        assert_eq!(phar, Path::new("/opt/wp-cli/wp-cli.phar"));
    }

    #[test]
    fn bat_file_launches_phar_with_passthrough_args() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file()
            .with(
                eq(Path::new("/opt/wp-cli/wp.bat")),
                eq("@ECHO OFF\nphp \"/opt/wp-cli/wp-cli.phar\" %*"),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let bat = installer(MockWpCli::new(), MockDownloader::new(), fs)
            .create_wp_cli_bat_file(Path::new("/opt/wp-cli/wp-cli.phar"))
            .unwrap();
        assert_eq!(bat, Path::new("/opt/wp-cli/wp.bat"));
    }
}
