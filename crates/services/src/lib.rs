#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export;
pub mod progress_service;

pub use fasttrack_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExportError, PlannerError, ProgressError};
pub use export::{CV_FILE_NAME, EXPORT_FILE_NAME};
pub use progress_service::ProgressService;
