// Console output: one human-readable line per step, prefixed with a
// status marker, plus a spinner while an archive is uploading.

use crate::batch::BatchReport;
use crate::error::{ApiError, LoadError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub fn folder_start(name: &str) {
    println!();
    println!("📁 Processing folder: {}", name);
}

pub fn metadata_loaded(path: &Path) {
    println!("✓ Loaded metadata from {}", path.display());
}

pub fn metadata_failed(err: &LoadError) {
    println!("✗ Error loading metadata: {}", err);
}

pub fn folder_unreadable(name: &str, err: &std::io::Error) {
    println!("✗ Could not list {}: {}", name, err);
}

pub fn no_metadata(name: &str) {
    println!("✗ No JSON metadata file found in {}, skipping", name);
}

pub fn no_archive(name: &str) {
    println!("⚠ No ZIP file found in {}, dataset created without files", name);
}

pub fn dataset_created(persistent_id: &str) {
    println!("✓ Created dataset: {}", persistent_id);
}

/// Lines reporting a failed API call. Rejections carry the status and the
/// response body on separate lines; anything that never got a response
/// prints the error itself.
pub fn failure_lines(action: &str, err: &ApiError) -> Vec<String> {
    match err {
        ApiError::Rejected { status, body } => vec![
            format!("✗ Failed to {}: {}", action, status),
            format!("  Response: {}", body),
        ],
        other => vec![format!("✗ Error trying to {}: {}", action, other)],
    }
}

pub fn dataset_failed(err: &ApiError) {
    for line in failure_lines("create dataset", err) {
        println!("{}", line);
    }
}

pub fn upload_done(file: &Path, persistent_id: &str) {
    println!("✓ Uploaded {} to {}", file.display(), persistent_id);
}

pub fn upload_failed(file: &Path, persistent_id: &str, err: &ApiError) {
    for line in failure_lines(&format!("upload {}", file.display()), err) {
        println!("{}", line);
    }
    println!("⚠ Dataset {} was created without its file", persistent_id);
}

/// Spinner shown while an archive is on the wire. Hidden automatically
/// when stderr is not a terminal.
pub fn upload_spinner(file: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Uploading {}...", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn summary(report: &BatchReport) {
    println!();
    println!(
        "Done: {} completed, {} partial, {} failed ({} folders)",
        report.completed(),
        report.partial(),
        report.failed(),
        report.folders.len()
    );
    for (name, outcome) in &report.folders {
        if let Some(pid) = outcome.persistent_id() {
            println!("  {} -> {}", name, pid);
        }
    }
}
