//! Test doubles for adapter tests.
//!
//! Enabled with the `testing` feature.

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::transport::{Transport, TransportError, WireRequest};

/// A [`Transport`] that replays queued results and records every request.
///
/// Queued results are returned in order. Once the queue is empty the
/// fallback (see [`ScriptedTransport::repeat`]) is returned forever; with
/// no fallback, further requests fail with a connection error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<String, TransportError>>>,
    fallback: Mutex<Option<Result<String, TransportError>>>,
    requests: Mutex<Vec<WireRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result.
    pub fn push(&self, result: Result<String, TransportError>) -> &Self {
        lock(&self.script).push_back(result);
        self
    }

    /// Queue a 2xx body.
    pub fn push_body(&self, body: impl Into<String>) -> &Self {
        self.push(Ok(body.into()))
    }

    /// Queue a non-2xx response.
    pub fn push_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Err(TransportError::status(status, body)))
    }

    /// Return `result` whenever the queue is empty.
    pub fn repeat(&self, result: Result<String, TransportError>) -> &Self {
        *lock(&self.fallback) = Some(result);
        self
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<WireRequest> {
        lock(&self.requests).clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Request bodies received so far, oldest first.
    #[must_use]
    pub fn bodies(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|r| r.body.clone().unwrap_or_default())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        lock(&self.requests).push(request);

        let next = lock(&self.script).pop_front();
        let result = next
            .or_else(|| lock(&self.fallback).clone())
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".to_string())));

        ready(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fallback() {
        let transport = ScriptedTransport::new();
        transport.push_body("first").push_status(503, "");
        transport.repeat(Ok("again".to_string()));

        let get = || transport.execute(WireRequest::get("https://example.com"));
        assert_eq!(get().await.unwrap(), "first");
        assert_eq!(get().await.unwrap_err().status_code(), Some(503));
        assert_eq!(get().await.unwrap(), "again");
        assert_eq!(get().await.unwrap(), "again");
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_script_is_connection_error() {
        let transport = ScriptedTransport::new();
        let result = transport.execute(WireRequest::get("https://example.com")).await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
