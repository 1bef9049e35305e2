//! One-shot download files: the JSON export and the plain-text CV.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fasttrack_core::model::{CvFields, ProgressState, Task, TaskCatalog, render_cv_text};
use serde::Serialize;
use tracing::info;

use crate::error::ExportError;

pub const EXPORT_FILE_NAME: &str = "fintech_fasttrack_export.json";
pub const CV_FILE_NAME: &str = "cv.txt";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    schedule: BTreeMap<u8, &'a [Task]>,
    progress: &'a ProgressState,
    cv_data: &'a CvFields,
}

/// Serialize the plan, progress and CV as pretty JSON (2-space indent).
///
/// Only weeks holding at least one task appear under `schedule`.
///
/// # Errors
///
/// Returns `ExportError::Encode` if serialization fails.
pub fn export_document(
    catalog: &TaskCatalog,
    progress: &ProgressState,
    cv: &CvFields,
) -> Result<String, ExportError> {
    let schedule = catalog
        .weeks_with_tasks()
        .map(|(week, tasks)| (week.value(), tasks))
        .collect();
    let document = ExportDocument {
        schedule,
        progress,
        cv_data: cv,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write the export document to `dir/fintech_fasttrack_export.json`.
///
/// # Errors
///
/// Returns `ExportError` if encoding or writing fails.
pub fn write_export(
    dir: &Path,
    catalog: &TaskCatalog,
    progress: &ProgressState,
    cv: &CvFields,
) -> Result<PathBuf, ExportError> {
    let body = export_document(catalog, progress, cv)?;
    write_file(dir.join(EXPORT_FILE_NAME), &body)
}

/// Write the rendered CV to `dir/cv.txt`.
///
/// # Errors
///
/// Returns `ExportError::Write` if the file cannot be written.
pub fn write_cv_text(dir: &Path, cv: &CvFields) -> Result<PathBuf, ExportError> {
    write_file(dir.join(CV_FILE_NAME), &render_cv_text(cv))
}

fn write_file(path: PathBuf, body: &str) -> Result<PathBuf, ExportError> {
    std::fs::write(&path, body).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), bytes = body.len(), "wrote file");
    Ok(path)
}
