use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown series: {0}")]
    UnknownSeries(String),

    #[error("empty grid: no driver produced a qualifying score")]
    EmptyGrid,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing data: {0}")]
    MissingData(String),
}

impl SimError {
    /// Whether the caller can skip the current stage and keep the
    /// season run alive. Missing files and bad configs abort the run;
    /// an empty grid only skips the event.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::EmptyGrid)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
