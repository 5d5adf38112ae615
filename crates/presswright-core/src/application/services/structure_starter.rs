//! Lays down the basic directory skeleton of a new site repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem, Reporter},
    },
    domain::{DefaultContent, ItemKind, Message, ProjectStructure, StructureItem},
    error::PresswrightResult,
};

/// Where a remote structure document is parked while it is read.
const SCRATCH_FILE: &str = ".presswright-structure.json";

/// What [`StructureStarter::start_basic_project_structure`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureReport {
    pub created: Vec<PathBuf>,
    /// Already present, left as they were.
    pub kept: Vec<PathBuf>,
}

pub struct StructureStarter {
    downloader: Arc<dyn Downloader>,
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
}

impl StructureStarter {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        filesystem: Arc<dyn Filesystem>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            downloader,
            filesystem,
            reporter,
        }
    }

    /// Read and validate a structure document.
    ///
    /// `location` is either an `http(s)` URL, fetched into `scratch_dir` and
    /// removed once read, or a local path.
    #[instrument(skip(self))]
    pub fn get_project_structure(
        &self,
        location: &str,
        scratch_dir: &Path,
    ) -> PresswrightResult<ProjectStructure> {
        let text = if is_url(location) {
            let scratch = scratch_dir.join(SCRATCH_FILE);
            self.downloader.download(location, &scratch)?;
            let text = self.filesystem.read_to_string(&scratch);
            self.filesystem.remove_file(&scratch)?;
            text?
        } else {
            self.filesystem.read_to_string(Path::new(location))?
        };

        let structure: ProjectStructure =
            serde_json::from_str(&text).map_err(|e| ApplicationError::Parse {
                path: PathBuf::from(location),
                reason: e.to_string(),
            })?;
        structure.validate()?;
        debug!(items = structure.item_count(), "Project structure read");
        Ok(structure)
    }

    /// Create every item of the structure at `location` below `root_path`.
    ///
    /// Existing directories are descended into; existing files are never
    /// overwritten.
    #[instrument(skip(self), fields(root = %root_path.display()))]
    pub fn start_basic_project_structure(
        &self,
        root_path: &Path,
        location: &str,
    ) -> PresswrightResult<StructureReport> {
        if !self.filesystem.is_dir(root_path) {
            return Err(ApplicationError::NotFound {
                path: root_path.to_path_buf(),
            }
            .into());
        }

        let structure = self.get_project_structure(location, root_path)?;
        let mut report = StructureReport::default();
        for item in &structure.items {
            self.add_item(item, root_path, &mut report)?;
        }

        info!(
            created = report.created.len(),
            kept = report.kept.len(),
            "Project structure started"
        );
        self.reporter.info(&Message::ProjectStructureStarted {
            root: root_path.to_path_buf(),
            created: report.created.len(),
            kept: report.kept.len(),
        });
        Ok(report)
    }

    /// Create one item (and, for directories, its children) below `base_path`.
    pub fn add_item(
        &self,
        item: &StructureItem,
        base_path: &Path,
        report: &mut StructureReport,
    ) -> PresswrightResult<()> {
        let path = base_path.join(item.name.trim());
        let present = self.filesystem.exists(&path);

        match item.kind {
            ItemKind::Directory => {
                if !present {
                    self.filesystem.create_dir_all(&path)?;
                }
                for child in &item.children {
                    self.add_item(child, &path, report)?;
                }
            }
            ItemKind::File if present => {}
            ItemKind::File => match &item.default_content {
                Some(DefaultContent::FromUrl(url)) => self.downloader.download(url, &path)?,
                Some(DefaultContent::Raw(text)) => self.filesystem.write_file(&path, text)?,
                None => self.filesystem.write_file(&path, "")?,
            },
        }

        debug!(path = %path.display(), present, "Structure item");
        if present {
            report.kept.push(path);
        } else {
            report.created.push(path);
        }
        Ok(())
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("https://") || location.starts_with("http://")
}
