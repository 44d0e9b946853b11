use thiserror::Error;

use crate::engine::EngineError;
use crate::io::IoError;
use crate::storage::StorageError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Output error: {0}")]
    Output(#[from] IoError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Logging setup failed: {0}")]
    Telemetry(String),
}
