use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification failures. Every variant carries a message suitable for
/// display to the user.
#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NetworkUnreachable(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    ServerRejected(String),
}

/// Discriminant of [`ClassificationError`], carried by the workflow's
/// failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationErrorKind {
    InvalidInput,
    NetworkUnreachable,
    Timeout,
    ServerRejected,
}

impl ClassificationError {
    pub fn kind(&self) -> ClassificationErrorKind {
        match self {
            Self::InvalidInput(_) => ClassificationErrorKind::InvalidInput,
            Self::NetworkUnreachable(_) => ClassificationErrorKind::NetworkUnreachable,
            Self::Timeout(_) => ClassificationErrorKind::Timeout,
            Self::ServerRejected(_) => ClassificationErrorKind::ServerRejected,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(msg)
            | Self::NetworkUnreachable(msg)
            | Self::Timeout(msg)
            | Self::ServerRejected(msg) => msg,
        }
    }
}
