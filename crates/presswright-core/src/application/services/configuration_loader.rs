//! Reads `site-config.json` / `constants.json` and locates them on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{Constants, DomainValidator as validator, SiteConfiguration},
    error::PresswrightResult,
};

/// How a file pattern treats several matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    /// More than one match is an [`ApplicationError::AmbiguousFile`].
    Unique,
    /// More than one match picks the first (sorted by path) and warns.
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    pub pattern: String,
    pub uniqueness: Uniqueness,
}

impl FilePattern {
    pub fn unique(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            uniqueness: Uniqueness::Unique,
        }
    }

    pub fn first_match(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            uniqueness: Uniqueness::FirstMatch,
        }
    }
}

pub struct ConfigurationLoader {
    filesystem: Arc<dyn Filesystem>,
}

impl ConfigurationLoader {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_site_configuration(&self, path: &Path) -> PresswrightResult<SiteConfiguration> {
        let config: SiteConfiguration = self.load_json(path)?;
        validator::validate_site_configuration(&config)?;
        debug!(
            environments = config.environments.len(),
            plugins = config.settings.plugins.len(),
            "Site configuration loaded"
        );
        Ok(config)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_constants(&self, path: &Path) -> PresswrightResult<Constants> {
        let constants: Constants = self.load_json(path)?;
        validator::validate_constants(&constants)?;
        Ok(constants)
    }

    /// Look every pattern up below `root_path`, one result per pattern.
    ///
    /// Zero matches yield `None`; several matches follow the pattern's
    /// [`Uniqueness`].
    #[instrument(skip(self, patterns), fields(root = %root_path.display()))]
    pub fn locate_required_files(
        &self,
        root_path: &Path,
        patterns: &[FilePattern],
    ) -> PresswrightResult<Vec<Option<PathBuf>>> {
        if !self.filesystem.is_dir(root_path) {
            return Err(ApplicationError::NotFound {
                path: root_path.to_path_buf(),
            }
            .into());
        }

        patterns
            .iter()
            .map(|p| {
                let mut matches = self.filesystem.find_files(root_path, &p.pattern)?;
                match (matches.len(), p.uniqueness) {
                    (0, _) => Ok(None),
                    (1, _) => Ok(matches.pop()),
                    (_, Uniqueness::Unique) => Err(ApplicationError::AmbiguousFile {
                        pattern: p.pattern.clone(),
                        matches,
                    }
                    .into()),
                    (n, Uniqueness::FirstMatch) => {
                        warn!(pattern = %p.pattern, matches = n, "Several files match; using the first");
                        Ok(matches.into_iter().next())
                    }
                }
            })
            .collect()
    }

    fn load_json<T: DeserializeOwned>(&self, path: &Path) -> PresswrightResult<T> {
        if !self.filesystem.exists(path) {
            return Err(ApplicationError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let raw = self.filesystem.read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            ApplicationError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
