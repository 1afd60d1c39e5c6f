//! Transport doubles shared by the store and service tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::MemoryTransport;
use crate::base::{ApiError, ApiRequest, ApiResult, Method, Transport};

/// Delegates to an in-memory backend until switched into failure mode
pub struct FlakyTransport {
    pub inner: MemoryTransport,
    failing: AtomicBool,
}

impl FlakyTransport {
    pub fn new(inner: MemoryTransport) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        self.inner.send(request).await
    }
}

/// Answers every POST with a bare `{ "id": ... }` record, the way a minimal
/// backend might
pub struct SparseEchoTransport {
    pub inner: MemoryTransport,
    pub id: &'static str,
}

#[async_trait]
impl Transport for SparseEchoTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        if request.method == Method::Post {
            return Ok(json!({ "id": self.id }));
        }
        self.inner.send(request).await
    }
}
