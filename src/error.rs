use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LeagueError {
    #[error("invalid card: holes {holes:?}")]
    InvalidCard { holes: Vec<i32> },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),
    #[error("stale read: {0}")]
    StaleRead(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("batch aborted by golfer {golfer_id}: {source}")]
    BatchAborted {
        golfer_id: i64,
        source: Box<LeagueError>,
    },
    #[error("cancelled")]
    Cancelled,
    #[error("db error: {0}")]
    Db(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

impl From<StorageError> for LeagueError {
    fn from(err: StorageError) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<String> for LeagueError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

impl From<&str> for LeagueError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}
