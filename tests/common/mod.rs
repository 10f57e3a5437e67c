//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use storefront_cache::access::{CacheTtls, StorefrontData};
use storefront_cache::cache::CacheService;
use storefront_cache::clock::ManualClock;
use storefront_cache::remote::{
    BackendError, RemoteExecutor, RemoteRequest, RemoteResponse, TransportError,
};
use storefront_cache::storage::MemoryStorage;
use storefront_cache::wrapper::{OperationWrapper, WrapperSettings};

type Reply = Result<RemoteResponse<Value>, TransportError>;

// == Scripted Executor ==
/// Executor that answers with queued replies, in order, and records requests.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    replies: Mutex<VecDeque<(Duration, Reply)>>,
    requests: Mutex<Vec<RemoteRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, delay: Duration, reply: Reply) {
        self.replies.lock().unwrap().push_back((delay, reply));
    }

    pub fn push_ok(&self, data: Value) {
        self.push(Duration::ZERO, Ok(RemoteResponse::ok(data)));
    }

    pub fn push_empty(&self) {
        self.push(Duration::ZERO, Ok(RemoteResponse::empty()));
    }

    pub fn push_backend_error(&self, error: BackendError) {
        self.push(Duration::ZERO, Ok(RemoteResponse::failed(error)));
    }

    pub fn push_transport_error(&self, error: TransportError) {
        self.push(Duration::ZERO, Err(error));
    }

    pub fn push_delayed(&self, delay: Duration, data: Value) {
        self.push(delay, Ok(RemoteResponse::ok(data)));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse<Value>, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Err(TransportError::Protocol("no scripted reply".to_string())),
        }
    }
}

// == Fixture ==
pub struct Fixture {
    pub data: StorefrontData,
    pub executor: Arc<ScriptedExecutor>,
    pub clock: Arc<ManualClock>,
    pub storage: Arc<MemoryStorage>,
}

pub fn fixture() -> Fixture {
    fixture_with_ttls(CacheTtls::default())
}

pub fn fixture_with_ttls(ttls: CacheTtls) -> Fixture {
    let executor = ScriptedExecutor::new();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let storage = Arc::new(MemoryStorage::new());

    let cache = CacheService::new(storage.clone(), clock.clone());
    let wrapper = OperationWrapper::new(executor.clone(), WrapperSettings::default())
        .with_clock(clock.clone());

    Fixture {
        data: StorefrontData::new(cache, wrapper, ttls),
        executor,
        clock,
        storage,
    }
}

pub fn product_row(id: i64, stock: i64) -> Value {
    serde_json::json!({
        "id": id,
        "nombre": format!("Producto {}", id),
        "precio": 4.25,
        "stock": stock,
        "categoria_id": 1,
        "categorias": {"nombre": "Analgésicos"}
    })
}
