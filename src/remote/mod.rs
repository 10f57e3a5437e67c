//! Remote Module
//!
//! Boundary with the hosted backend. The crate only describes what to run
//! (declarative queries, mutations, procedure calls); executing them is the
//! job of a [`RemoteExecutor`] supplied by the application.

mod query;
mod response;

pub use query::{Cardinality, Filter, Mutation, MutationKind, Order, Query, RemoteRequest};
pub use response::{BackendError, RemoteResponse, TransportError};

use async_trait::async_trait;
use serde_json::Value;

// == Remote Executor ==
/// Runs a [`RemoteRequest`] against the backend.
///
/// Resolving to `Ok` with an error payload means the backend answered and
/// refused; resolving to `Err` means no usable answer arrived.
#[async_trait]
pub trait RemoteExecutor: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse<Value>, TransportError>;
}
