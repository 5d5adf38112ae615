//! End-to-end provisioning against the in-memory adapters.

use std::path::Path;
use std::sync::Arc;

use presswright_adapters::{MemoryFilesystem, RecordingWpCli, TracingReporter};
use presswright_core::application::{
    ConfigurationLoader, Ports, ProvisionRequest, ProvisioningOrchestrator, ProvisioningSettings,
};
use presswright_core::domain::{CommandOutput, FailurePolicy, ProvisioningStage, WpCommand};
use presswright_core::error::PresswrightResult;
use presswright_core::prelude::Downloader;

const SITE_CONFIG: &str = r#"{
    "$schema": "./site-config.schema.json",
    "database": {"name": "example", "user": "example_user", "dumps": {"core": "[date|Y.m.d-His]-db.core.sql"}},
    "settings": {
        "title": "Example",
        "description": "An example site",
        "admin": {"user": "admin", "email": "admin@example.com"},
        "aws_cloudfront": true,
        "plugins": [
            {"name": "my-plugin", "source": "zip", "activate": true}
        ]
    },
    "content": {"author_handling": "create", "sources": {"post": "posts.xml", "page": ""}},
    "environments": [{
        "name": "localhost",
        "base_url": "http://localhost:8080",
        "wp_config": {
            "WP_CONTENT_URL": {"value": "/wp-content"},
            "WP_DEBUG": {"value": true}
        }
    }]
}"#;

const CONSTANTS: &str = r#"{
    "paths": {
        "wordpress": "/wordpress",
        "database": "/database",
        "content": {"themes": "/content/themes", "plugins": "/content/plugins", "wxr": "/content/wxr"}
    }
}"#;

const WP_CONFIG: &str = "<?php\ndefine( 'DB_NAME', 'example' );\n\n/** Sets up WordPress vars and included files. */\nrequire_once ABSPATH . 'wp-settings.php';\n";

struct NoDownloads;

impl Downloader for NoDownloads {
    fn download(&self, url: &str, _destination: &Path) -> PresswrightResult<()> {
        panic!("unexpected download of {url}");
    }
}

fn site_tree() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_file("/site/site-config.json", SITE_CONFIG)
        .with_file("/tool/constants.json", CONSTANTS)
        .with_file(
            "/tool/default-files/default-cloudfront-forwarded-proto.php",
            "$_SERVER['HTTPS'] = 'on';\n",
        )
        .with_file("/site/wordpress/wp-config.php", WP_CONFIG)
        .with_file("/site/wordpress/wp-content/.gitkeep", "")
        .with_file("/site/content/plugins/.gitkeep", "")
        .with_file("/site/content/plugins/my-plugin-1.2.0.zip", "PK")
        .with_dir("/site/content/themes")
        .with_dir("/site/content/wxr")
        .with_dir("/site/database")
}

fn orchestrator(wp: &RecordingWpCli, fs: &MemoryFilesystem) -> ProvisioningOrchestrator {
    ProvisioningOrchestrator::new(
        Ports {
            wp_cli: Arc::new(wp.clone()),
            filesystem: Arc::new(fs.clone()),
            downloader: Arc::new(NoDownloads),
            reporter: Arc::new(TracingReporter::new()),
        },
        ProvisioningSettings {
            policy: FailurePolicy::Abort,
            snippets_dir: "/tool/default-files".into(),
            ..ProvisioningSettings::default()
        },
    )
}

#[test]
fn provisions_site_from_documents_on_disk() {
    let fs = site_tree();
    let loader = ConfigurationLoader::new(Arc::new(fs.clone()));
    let site_config = loader
        .load_site_configuration(Path::new("/site/site-config.json"))
        .unwrap();
    let constants = loader
        .load_constants(Path::new("/tool/constants.json"))
        .unwrap();

    let wp = RecordingWpCli::new();
    wp.respond("eval", CommandOutput::ok("2024.01.31-120000\n"));

    let report = orchestrator(&wp, &fs)
        .provision(
            &site_config,
            &constants,
            &ProvisionRequest::new("localhost", "/site"),
        )
        .unwrap();

    assert_eq!(
        wp.command_names(),
        vec![
            "core download",
            "db create",
            "config create",
            "config set",
            "config set",
            "core install",
            "option update",
            "plugin install",
            "post delete",
            "import",
            "eval",
            "transient delete",
            "db export",
        ]
    );
    assert_eq!(report.completed, ProvisioningStage::ALL.to_vec());
    assert_eq!(
        report.dump_path.as_deref(),
        Some(Path::new("/site/database/2024.01.31-120000-db.core.sql"))
    );
    assert!(report.cloudfront_applied);
    assert_eq!(report.gitkeep_purged, 2);
    assert!(fs.read_file(Path::new("/site/content/plugins/.gitkeep")).is_none());

    let commands = wp.commands();
    assert!(commands.iter().any(|c| matches!(c,
        WpCommand::ConfigSet(s) if s.name == "WP_CONTENT_URL" && s.value == "http://localhost:8080/wp-content")));
    assert!(commands.iter().any(|c| matches!(c,
        WpCommand::PluginInstall(p) if p.source == "/site/content/plugins/my-plugin-1.2.0.zip" && p.activate)));
    assert!(commands.iter().any(|c| matches!(c,
        WpCommand::ImportWxr(i) if i.file == Path::new("/site/content/wxr/posts.xml"))));

    let wp_config = fs
        .read_file(Path::new("/site/wordpress/wp-config.php"))
        .unwrap();
    let snippet = wp_config.find("$_SERVER['HTTPS']").unwrap();
    assert!(snippet < wp_config.find("/** Sets up").unwrap());
}

#[test]
fn missing_wordpress_directory_fails_before_download() {
    let fs = MemoryFilesystem::new().with_dir("/site");
    let loader_fs = site_tree();
    let loader = ConfigurationLoader::new(Arc::new(loader_fs));
    let site_config = loader
        .load_site_configuration(Path::new("/site/site-config.json"))
        .unwrap();
    let constants = loader
        .load_constants(Path::new("/tool/constants.json"))
        .unwrap();

    let wp = RecordingWpCli::new();
    let err = orchestrator(&wp, &fs)
        .provision(
            &site_config,
            &constants,
            &ProvisionRequest::new("localhost", "/site"),
        )
        .unwrap_err();

    assert!(err.to_string().contains("/site/wordpress"));
    assert!(wp.commands().is_empty());
}

#[test]
fn abort_policy_stops_on_failed_install() {
    let fs = site_tree();
    let loader = ConfigurationLoader::new(Arc::new(fs.clone()));
    let site_config = loader
        .load_site_configuration(Path::new("/site/site-config.json"))
        .unwrap();
    let constants = loader
        .load_constants(Path::new("/tool/constants.json"))
        .unwrap();

    let wp = RecordingWpCli::new();
    wp.respond(
        "core install",
        CommandOutput {
            stdout: String::new(),
            stderr: "Error: Error establishing a database connection.".into(),
            exit_code: Some(1),
        },
    );

    let result = orchestrator(&wp, &fs).provision(
        &site_config,
        &constants,
        &ProvisionRequest::new("localhost", "/site"),
    );

    assert!(result.is_err());
    assert_eq!(wp.command_names().last(), Some(&"core install"));
}
