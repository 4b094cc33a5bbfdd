use thiserror::Error;

/// Rejected structural operations on a map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("The root node cannot be deleted")]
    CannotDeleteRoot,

    #[error("Map index {0} is out of range")]
    MapIndexOutOfRange(usize),
}

/// Failures reading or writing the persisted state record.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored state failed validation: {0}")]
    Invalid(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the topic suggestion collaborator. None of these touch the map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    #[error("No suggestion command is configured")]
    NotConfigured,

    #[error("An expansion is already running")]
    Busy,

    #[error("Could not start suggestion command: {0}")]
    Spawn(String),

    #[error("Suggestion failed: {0}")]
    Failed(String),

    #[error("No topics were suggested")]
    Empty,
}
