//! Error types for the Mind Engine
//!
//! Per spec, storage faults are swallowed at the Store boundary and never
//! reach callers of Store methods (they return sentinels instead). This
//! `Error` type exists for the layer above the Store — directory creation,
//! db-open, and config loading — where a caller genuinely needs to know
//! something failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid agent id: {0}")]
    InvalidAgentId(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
