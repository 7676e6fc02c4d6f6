use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid interaction config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("no document available to mount on")]
    MissingDocument,

    #[error("host: {0}")]
    Host(String),
}

/// Failure reported by the host when a clipboard write is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard write rejected: {reason}")]
pub struct ClipboardError {
    pub reason: String,
}

impl ClipboardError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
