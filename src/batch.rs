// Batch driver and per-folder processing.
//
// Each dataset folder is taken from start to finish before the next one is
// looked at: find the files, load the metadata, create the dataset, attach
// the archive, pause. Errors stop at the folder boundary and become a
// `FolderOutcome`; only problems with the root folder itself abort the run.

use crate::api::ApiClient;
use crate::config::Config;
use crate::metadata::{creation_payload, load_metadata};
use crate::ui;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// How far a single folder got.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderOutcome {
    /// Dataset created and archive attached.
    Completed { persistent_id: String },
    /// Dataset created, but it has no archive: none was found or the upload
    /// failed.
    Partial {
        persistent_id: String,
        reason: String,
    },
    /// No dataset was created.
    Failed { reason: String },
}

impl FolderOutcome {
    pub fn persistent_id(&self) -> Option<&str> {
        match self {
            FolderOutcome::Completed { persistent_id }
            | FolderOutcome::Partial { persistent_id, .. } => Some(persistent_id),
            FolderOutcome::Failed { .. } => None,
        }
    }
}

/// Outcome of every folder visited, in visiting order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub folders: Vec<(String, FolderOutcome)>,
    pub creation_attempts: usize,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Completed { .. }))
    }

    pub fn partial(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Partial { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FolderOutcome) -> bool) -> usize {
        self.folders.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// The metadata and archive picked out of one dataset folder.
#[derive(Debug, Default, PartialEq)]
pub struct DatasetFiles {
    pub metadata: Option<PathBuf>,
    pub archive: Option<PathBuf>,
}

/// Pick the first `*.json` and the first `*.zip` file in `dir`, in the
/// order the directory listing returns them.
pub fn find_dataset_files(dir: &Path) -> std::io::Result<DatasetFiles> {
    let mut files = DatasetFiles::default();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") if files.metadata.is_none() => files.metadata = Some(path),
            Some("zip") if files.archive.is_none() => files.archive = Some(path),
            _ => {}
        }
    }
    Ok(files)
}

/// Runs the upload over a configured root folder.
pub struct Uploader<'a> {
    config: &'a Config,
    api: ApiClient,
}

impl<'a> Uploader<'a> {
    pub fn new(config: &'a Config, api: ApiClient) -> Self {
        Uploader { config, api }
    }

    /// Process every subdirectory of the datasets folder in name order.
    /// Plain files in the root are ignored. Every folder that sent a
    /// creation request is followed by the configured delay.
    pub fn run(&self) -> Result<BatchReport> {
        let root = &self.config.datasets_folder;
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(root)
            .with_context(|| format!("Failed to read datasets folder {}", root.display()))?
        {
            let entry = entry.context("Failed to list datasets folder")?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                debug!("Skipping non-directory {}", path.display());
            }
        }
        dirs.sort();
        info!("Found {} dataset folders in {}", dirs.len(), root.display());

        let mut report = BatchReport::default();
        for dir in dirs {
            let name = folder_name(&dir);
            ui::folder_start(&name);
            let (outcome, attempted) = self.process_folder(&dir);
            if attempted {
                report.creation_attempts += 1;
                if !self.config.delay.is_zero() {
                    std::thread::sleep(self.config.delay);
                }
            }
            report.folders.push((name, outcome));
        }
        Ok(report)
    }

    /// Take one folder through metadata, creation and upload. The flag is
    /// true when a creation request was sent.
    pub fn process_folder(&self, dir: &Path) -> (FolderOutcome, bool) {
        let name = folder_name(dir);
        let files = match find_dataset_files(dir) {
            Ok(files) => files,
            Err(e) => {
                ui::folder_unreadable(&name, &e);
                return (fail(format!("could not list folder: {e}")), false);
            }
        };

        let Some(metadata_path) = files.metadata else {
            ui::no_metadata(&name);
            return (fail("no JSON metadata file".into()), false);
        };

        let document = match load_metadata(&metadata_path) {
            Ok(doc) => {
                ui::metadata_loaded(&metadata_path);
                doc
            }
            Err(e) => {
                ui::metadata_failed(&e);
                return (fail(e.to_string()), false);
            }
        };

        let payload = creation_payload(document);
        let created = match self.api.create_dataset(&self.config.dataverse, &payload) {
            Ok(created) => created,
            Err(e) => {
                ui::dataset_failed(&e);
                return (fail(format!("dataset creation failed: {e}")), true);
            }
        };
        ui::dataset_created(&created.persistent_id);
        debug!("{} created as dataset id {}", name, created.id);
        let persistent_id = created.persistent_id;

        let Some(archive) = files.archive else {
            ui::no_archive(&name);
            let reason = "no ZIP file".to_string();
            return (FolderOutcome::Partial { persistent_id, reason }, true);
        };

        let spinner = ui::upload_spinner(&archive);
        let uploaded = self.api.upload_file(&persistent_id, &archive);
        spinner.finish_and_clear();

        let outcome = match uploaded {
            Ok(()) => {
                ui::upload_done(&archive, &persistent_id);
                FolderOutcome::Completed { persistent_id }
            }
            Err(e) => {
                ui::upload_failed(&archive, &persistent_id, &e);
                FolderOutcome::Partial {
                    persistent_id,
                    reason: format!("upload failed: {e}"),
                }
            }
        };
        (outcome, true)
    }
}

fn fail(reason: String) -> FolderOutcome {
    FolderOutcome::Failed { reason }
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
