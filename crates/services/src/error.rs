//! Shared error types for the services crate.

use thiserror::Error;

use fasttrack_core::model::{CatalogError, QuizError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("failed to persist progress: {0}")]
    Persist(#[from] StorageError),
}

/// Errors emitted while producing export files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("failed to encode export document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by planner operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
