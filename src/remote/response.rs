//! Backend answers and transport failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// == Backend Error ==
/// Error object reported by the backend inside an otherwise completed call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// == Remote Response ==
/// `{data, error}` pair as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<BackendError>,
}

impl<T> RemoteResponse<T> {
    /// A successful answer carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A successful answer with no rows.
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    /// A completed call the backend refused.
    pub fn failed(error: BackendError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }
}

// == Transport Error ==
/// The call did not produce a backend answer at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection-level failure, displayed as the bare cause
    #[error("{0}")]
    Network(String),

    /// The request was cancelled before completing
    #[error("request aborted: {0}")]
    Aborted(String),

    /// The backend answered with something that is not a `{data, error}` pair
    #[error("protocol error: {0}")]
    Protocol(String),
}
