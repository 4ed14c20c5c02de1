use thiserror::Error;

use crate::domain::{InvalidWindow, UnknownVariant};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid report window: {0}")]
    InvalidWindow(#[from] InvalidWindow),

    #[error("Invalid value: {0}")]
    InvalidValue(#[from] UnknownVariant),

    #[error("Viewer id is required for role {0}")]
    MissingViewerId(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}
