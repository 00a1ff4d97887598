//! 测试辅助模块
//!
//! [`MockTransport`] records every request it receives and answers with canned
//! responses in FIFO order. Enabled in this crate's unit tests and, for other
//! crates, through the `test-util` feature.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpRequest, HttpResponse, HttpTransport};

/// Scripted transport for exercising the client without a network.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with the given status and body.
    pub async fn push(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queues a response whose body is `value` serialized as JSON.
    pub async fn push_json(&self, status: u16, value: &serde_json::Value) {
        self.push(status, value.to_string()).await;
    }

    /// Queues a transport-level failure.
    pub async fn push_error(&self, error: ProviderError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Every request sent so far, in order.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    /// `"METHOD path"` of every request sent so far, without query strings.
    pub async fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| {
                let path = r.url.split('?').next().unwrap_or_default();
                let path = path
                    .find("/dns/")
                    .map_or(path, |start| &path[start..]);
                format!("{} {path}", r.method)
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let description = format!("{} {}", request.method, request.url);
        self.requests.lock().await.push(request);
        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(ProviderError::NetworkError {
                detail: format!("no canned response for {description}"),
            })
        })
    }
}
