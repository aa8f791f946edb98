//! Error types shared across the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("employee count must be greater than zero")]
    InvalidEmployeeCount,

    #[error("invalid {field} for tool {tool_id}: {value}")]
    InvalidFee {
        tool_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("tool {0} selected more than once")]
    DuplicateTool(String),

    #[error("unknown tool {0} and no fee override supplied")]
    UnknownTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot store lock poisoned")]
    SnapshotLock,
}

impl EngineError {
    /// Whether the error was caused by the caller's input rather than
    /// by the engine or its storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidEmployeeCount
                | EngineError::InvalidFee { .. }
                | EngineError::DuplicateTool(_)
                | EngineError::UnknownTool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
