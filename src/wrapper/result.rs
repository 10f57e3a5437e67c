//! Normalized operation outcomes.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::remote::BackendError;

/// Message carried by every failure that did not come from the backend.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected operation error";

/// Message carried by failures caused by the operation timeout.
pub const TIMEOUT_ERROR_MESSAGE: &str = "operation timed out";

// == Error Kind ==
/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backend answered with an error object
    Backend,
    /// No usable answer: transport fault or undecodable payload
    Unexpected,
    /// No answer within the configured bound
    Timeout,
}

// == Error Info ==
/// Uniform error shape handed to callers regardless of backend.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{operation_name}: {message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub code: Option<String>,
    pub operation_name: String,
    pub timestamp: DateTime<Utc>,
    pub original_error: Option<String>,
}

impl ErrorInfo {
    /// Re-wraps a backend error, keeping only its message and code.
    pub fn backend(operation_name: &str, error: &BackendError, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: ErrorKind::Backend,
            message: error.message.clone(),
            code: error.code.clone(),
            operation_name: operation_name.to_string(),
            timestamp,
            original_error: None,
        }
    }

    /// Wraps a fault that prevented any backend answer.
    pub fn unexpected(
        operation_name: &str,
        original: impl Display,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            message: UNEXPECTED_ERROR_MESSAGE.to_string(),
            code: None,
            operation_name: operation_name.to_string(),
            timestamp,
            original_error: Some(original.to_string()),
        }
    }

    /// Reports an operation abandoned after `limit`.
    pub fn timeout(operation_name: &str, limit: Duration, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: TIMEOUT_ERROR_MESSAGE.to_string(),
            code: None,
            operation_name: operation_name.to_string(),
            timestamp,
            original_error: Some(format!("operation exceeded {} ms", limit.as_millis())),
        }
    }

    /// True when the operation was abandoned by the timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

// == Operation Metadata ==
/// Timing attached to every successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    pub operation_name: String,
    /// Wall time from start to completion
    pub duration_ms: u64,
    /// Completion time
    pub timestamp: DateTime<Utc>,
}

// == Operation Result ==
/// Outcome of a wrapped operation: either data or an error, never both.
///
/// A success may still carry no data, for reads that matched nothing and
/// writes that return no rows.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success {
        data: Option<T>,
        metadata: OperationMetadata,
    },
    Failure(ErrorInfo),
}

impl<T> OperationResult<T> {
    /// True for [`OperationResult::Success`], with or without data.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    /// Borrowed payload; `None` on failure or on an empty success.
    pub fn data(&self) -> Option<&T> {
        match self {
            OperationResult::Success { data, .. } => data.as_ref(),
            OperationResult::Failure(_) => None,
        }
    }

    /// Borrowed error, present only on failure.
    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure(error) => Some(error),
        }
    }

    /// Timing of a successful operation.
    pub fn metadata(&self) -> Option<&OperationMetadata> {
        match self {
            OperationResult::Success { metadata, .. } => Some(metadata),
            OperationResult::Failure(_) => None,
        }
    }

    /// Converts into a plain `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<Option<T>, ErrorInfo> {
        match self {
            OperationResult::Success { data, .. } => Ok(data),
            OperationResult::Failure(error) => Err(error),
        }
    }

    /// Transforms the payload of a success, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            OperationResult::Success { data, metadata } => OperationResult::Success {
                data: data.map(f),
                metadata,
            },
            OperationResult::Failure(error) => OperationResult::Failure(error),
        }
    }
}
