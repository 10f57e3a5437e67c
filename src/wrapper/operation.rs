//! Operation wrapper.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::clock::{Clock, SystemClock};
use crate::remote::{Mutation, Query, RemoteExecutor, RemoteRequest, RemoteResponse, TransportError};
use crate::wrapper::{ErrorInfo, OperationMetadata, OperationResult};

/// Default duration above which an operation is logged as slow.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(1000);

/// Default bound on a single remote operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(15);

// == Wrapper Settings ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperSettings {
    /// Operations longer than this emit a warning
    pub slow_threshold: Duration,
    /// Operations longer than this are abandoned and reported as timeouts
    pub timeout: Duration,
}

impl Default for WrapperSettings {
    fn default() -> Self {
        Self {
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

// == Operation Wrapper ==
/// Uniform execution path for remote operations.
///
/// No method returns an error or panics on a failed operation: every outcome
/// comes back as an [`OperationResult`].
#[derive(Debug, Clone)]
pub struct OperationWrapper {
    executor: Arc<dyn RemoteExecutor>,
    clock: Arc<dyn Clock>,
    settings: WrapperSettings,
}

impl OperationWrapper {
    pub fn new(executor: Arc<dyn RemoteExecutor>, settings: WrapperSettings) -> Self {
        Self {
            executor,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Uses `clock` for result timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> WrapperSettings {
        self.settings
    }

    // == Run ==
    /// Awaits `operation` under the timeout and normalizes what it produced.
    ///
    /// This is the core every other method goes through; it can also wrap
    /// any future that resolves to a backend `{data, error}` pair.
    pub async fn run<T, F>(&self, operation_name: &str, operation: F) -> OperationResult<T>
    where
        F: Future<Output = Result<RemoteResponse<T>, TransportError>>,
    {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.settings.timeout, operation).await;
        let elapsed = started.elapsed();
        let duration_ms = elapsed.as_millis() as u64;
        let timestamp = self.clock.now();

        if elapsed > self.settings.slow_threshold {
            warn!(operation = operation_name, duration_ms, "slow operation");
        }

        let result = match outcome {
            Err(_) => OperationResult::Failure(ErrorInfo::timeout(
                operation_name,
                self.settings.timeout,
                timestamp,
            )),
            Ok(Err(transport)) => {
                OperationResult::Failure(ErrorInfo::unexpected(operation_name, &transport, timestamp))
            }
            Ok(Ok(RemoteResponse {
                error: Some(backend),
                ..
            })) => OperationResult::Failure(ErrorInfo::backend(operation_name, &backend, timestamp)),
            Ok(Ok(RemoteResponse { data, error: None })) => OperationResult::Success {
                data,
                metadata: OperationMetadata {
                    operation_name: operation_name.to_string(),
                    duration_ms,
                    timestamp,
                },
            },
        };

        match &result {
            OperationResult::Success { data, .. } => debug!(
                operation = operation_name,
                duration_ms,
                has_data = data.is_some(),
                "operation succeeded"
            ),
            OperationResult::Failure(info) => error!(
                operation = operation_name,
                duration_ms,
                kind = ?info.kind,
                code = info.code.as_deref().unwrap_or(""),
                original = info.original_error.as_deref().unwrap_or(""),
                "operation failed: {}",
                info.message
            ),
        }

        result
    }

    // == Select ==
    /// Runs a read and decodes its rows into `T`.
    pub async fn select<T: DeserializeOwned>(&self, operation_name: &str, query: Query) -> OperationResult<T> {
        self.execute(operation_name, RemoteRequest::Select(query)).await
    }

    // == Modify ==
    /// Runs a write and decodes any returned rows into `T`.
    pub async fn modify<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        mutation: Mutation,
    ) -> OperationResult<T> {
        self.execute(operation_name, RemoteRequest::Modify(mutation)).await
    }

    // == RPC ==
    /// Invokes a remote procedure and decodes its return value into `T`.
    pub async fn rpc<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        procedure: &str,
        params: Map<String, Value>,
    ) -> OperationResult<T> {
        let request = RemoteRequest::Rpc {
            procedure: procedure.to_string(),
            params,
        };
        self.execute(operation_name, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        request: RemoteRequest,
    ) -> OperationResult<T> {
        debug!(operation = operation_name, target = request.target(), "running operation");
        let raw = self.run(operation_name, self.executor.execute(request)).await;
        self.decode(operation_name, raw)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        raw: OperationResult<Value>,
    ) -> OperationResult<T> {
        match raw {
            OperationResult::Success {
                data: None | Some(Value::Null),
                metadata,
            } => OperationResult::Success { data: None, metadata },
            OperationResult::Success {
                data: Some(value),
                metadata,
            } => match serde_json::from_value(value) {
                Ok(data) => OperationResult::Success {
                    data: Some(data),
                    metadata,
                },
                Err(err) => {
                    error!(operation = operation_name, error = %err, "operation payload undecodable");
                    OperationResult::Failure(ErrorInfo::unexpected(
                        operation_name,
                        format!("undecodable payload: {}", err),
                        self.clock.now(),
                    ))
                }
            },
            OperationResult::Failure(info) => OperationResult::Failure(info),
        }
    }
}
