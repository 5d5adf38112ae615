//! Picks the active environment out of a site configuration.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::ports::Reporter,
    domain::{DomainError, Environment, Message, SiteConfiguration},
    error::PresswrightResult,
};

pub struct EnvironmentResolver {
    reporter: Arc<dyn Reporter>,
}

impl EnvironmentResolver {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Select `environment_name` by exact match.
    ///
    /// Several matches are tolerated: the first one declared wins and a single
    /// warning is reported. The returned copy has its database block filled
    /// from the site-level defaults, `wp_cli_debug` raised by the site-wide
    /// `wp_cli.debug`, and every `*_url` constant made absolute against
    /// `base_url`.
    #[instrument(skip(self, site_config))]
    pub fn resolve(
        &self,
        site_config: &SiteConfiguration,
        environment_name: &str,
    ) -> PresswrightResult<Environment> {
        let matches: Vec<&Environment> = site_config
            .environments
            .iter()
            .filter(|e| e.name == environment_name)
            .collect();

        let Some(first) = matches.first() else {
            return Err(DomainError::EnvironmentNotFound {
                name: environment_name.to_string(),
            }
            .into());
        };

        if matches.len() > 1 {
            debug!(count = matches.len(), "Ambiguous environment name");
            self.reporter.warning(&Message::AmbiguousEnvironment {
                name: environment_name.to_string(),
                count: matches.len(),
            });
        }

        let mut environment = (*first).clone();
        environment.database.inherit_from(&site_config.database);
        environment.wp_cli_debug = site_config.wp_cli_debug(&environment);
        environment.absolutize_url_constants();

        info!(base_url = %environment.base_url, "Environment resolved");
        Ok(environment)
    }
}
