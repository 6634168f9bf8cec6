use thiserror::Error;

use common::error::Error as CoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Logging setup failed: {0}")]
    LoggingError(String),

    #[error("An input file is required for the CSV data source.")]
    MissingInput,

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Pipeline task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
