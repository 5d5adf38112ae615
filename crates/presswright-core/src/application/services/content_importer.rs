//! Purge-then-import of WXR content per post type.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{ports::Reporter, services::executor::CommandExecutor},
    domain::{
        AuthorsHandling, Constants, Environment, ImportWxr, Message, PostDeleteByType,
        SiteConfiguration, WpCommand,
    },
    error::PresswrightResult,
};

pub struct ContentImporter {
    executor: CommandExecutor,
    reporter: Arc<dyn Reporter>,
}

impl ContentImporter {
    pub fn new(executor: CommandExecutor, reporter: Arc<dyn Reporter>) -> Self {
        Self { executor, reporter }
    }

    /// For each declared content type, in document order: delete every post
    /// of that type, then import its WXR file.
    ///
    /// No `content` block or no usable sources means no wp-cli calls.
    /// Returns the number of content types imported.
    #[instrument(skip_all, fields(environment = %environment.name))]
    pub fn import_all(
        &self,
        site_config: &SiteConfiguration,
        environment: &Environment,
        root_path: &Path,
        constants: &Constants,
    ) -> PresswrightResult<usize> {
        let sources = site_config
            .content
            .as_ref()
            .map(|c| c.sources())
            .unwrap_or_default();
        if sources.is_empty() {
            self.reporter.info(&Message::NoContent);
            return Ok(0);
        }

        let wordpress_path = constants.wordpress_path(root_path);
        let wxr_path = constants.wxr_path(root_path);
        let authors = site_config.author_handling();
        let debug = site_config.wp_cli_debug(environment);

        for source in &sources {
            let file = wxr_path.join(&source.file);
            self.reporter.info(&Message::ContentImporting {
                content_type: source.content_type.clone(),
                file: file.clone(),
            });
            self.delete_post_type_content(&wordpress_path, &source.content_type, debug)?;
            self.import_wxr_content(&wordpress_path, &file, &authors, debug)?;
        }

        info!(types = sources.len(), "Content imported");
        Ok(sources.len())
    }

    pub fn delete_post_type_content(
        &self,
        wordpress_path: &Path,
        post_type: &str,
        debug: bool,
    ) -> PresswrightResult<()> {
        self.executor
            .execute(WpCommand::PostDeleteByType(PostDeleteByType {
                path: wordpress_path.to_path_buf(),
                post_type: post_type.to_string(),
                debug,
            }))
            .map(|_| ())
    }

    pub fn import_wxr_content(
        &self,
        wordpress_path: &Path,
        wxr_file: &Path,
        authors: &AuthorsHandling,
        debug: bool,
    ) -> PresswrightResult<()> {
        self.executor
            .execute(WpCommand::ImportWxr(ImportWxr {
                path: wordpress_path.to_path_buf(),
                file: wxr_file.to_path_buf(),
                authors: authors.clone(),
                debug,
            }))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockall::Sequence;

    use super::*;
    use crate::application::ports::{MockReporter, MockWpCli};
    use crate::domain::{CommandOutput, FailurePolicy};

    fn site(content: &str) -> SiteConfiguration {
        serde_json::from_str(&format!(
            r#"{{
                "settings": {{"title": "T", "admin": {{"user": "a", "email": "a@example.com"}}}},
                "environments": [{{"name": "localhost", "base_url": "http://localhost"}}]
                {content}
            }}"#
        ))
        .unwrap()
    }

    fn constants() -> Constants {
        serde_json::from_str(r#"{"paths": {"wordpress": "/wordpress", "content": {"wxr": "/content/wxr"}}}"#)
            .unwrap()
    }

    fn importer(wp: MockWpCli) -> ContentImporter {
        let mut reporter = MockReporter::new();
        reporter.expect_info().return_const(());
        let reporter: Arc<dyn Reporter> = Arc::new(reporter);
        ContentImporter::new(
            CommandExecutor::new(Arc::new(wp), reporter.clone(), FailurePolicy::Continue),
            reporter,
        )
    }

    #[test]
    fn absent_or_empty_content_issues_no_calls() {
        for content in [
            "",
            r#", "content": {"sources": {}}"#,
            r#", "content": {"sources": {"page": ""}}"#,
            r#", "content": {"author_handling": {}, "sources": {}}"#,
        ] {
            let mut wp = MockWpCli::new();
            wp.expect_run().never();
            let config = site(content);
            let count = importer(wp)
                .import_all(&config, &config.environments[0], Path::new("/site"), &constants())
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn delete_and_import_are_interleaved_per_type() {
        let config = site(
            r#", "content": {"author_handling": "create", "sources": {"page": "page.xml", "nav_menu_item": "menus.xml"}}"#,
        );

        let mut seq = Sequence::new();
        let mut wp = MockWpCli::new();
        for (post_type, file) in [("page", "page.xml"), ("nav_menu_item", "menus.xml")] {
            wp.expect_run()
                .withf(move |c| matches!(c, WpCommand::PostDeleteByType(d) if d.post_type == post_type))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(CommandOutput::ok("")));
            let expected = PathBuf::from("/site/content/wxr").join(file);
            wp.expect_run()
                .withf(move |c| {
                    matches!(c, WpCommand::ImportWxr(i)
                        if i.file == expected && i.authors == AuthorsHandling::Create)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(CommandOutput::ok("")));
        }

        let count = importer(wp)
            .import_all(&config, &config.environments[0], Path::new("/site"), &constants())
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn site_wide_debug_reaches_import_commands() {
        let mut config = site(r#", "content": {"sources": {"post": "posts.xml"}}"#);
        config.wp_cli.debug = true;

        let mut wp = MockWpCli::new();
        wp.expect_run()
            .withf(|c| match c {
                WpCommand::PostDeleteByType(d) => d.debug,
                WpCommand::ImportWxr(i) => i.debug,
                _ => false,
            })
            .times(2)
            .returning(|_| Ok(CommandOutput::ok("")));

        importer(wp)
            .import_all(&config, &config.environments[0], Path::new("/site"), &constants())
            .unwrap();
    }
}
