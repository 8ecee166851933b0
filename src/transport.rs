//! HTTP transport abstraction.
//!
//! The [`Transport`] trait is the seam between the fluent sender and the
//! byte-level HTTP client, so tests can substitute a double and capture the
//! outgoing request instead of hitting the network. [`ReqwestTransport`] is
//! the production implementation.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;
use crate::response::{RawResponse, ResponseBody};
use crate::types::{Header, HttpRequest};

/// Executes a single request/response exchange.
///
/// A transport acquires whatever connection resource it needs for exactly one
/// exchange and releases it unconditionally: on failure before returning, and
/// on success when the returned [`RawResponse`] (or its body) is dropped or
/// read. Timeouts are enforced by the caller, not the transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
///
/// One transport (and therefore one connection pool) is owned per
/// [`RequestSender`]; verb calls reuse it instead of constructing a fresh
/// client per request.
///
/// [`RequestSender`]: crate::sender::RequestSender
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Wrap an existing client, keeping its pool and TLS configuration.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);

        // Replayed one by one: reqwest appends, preserving insertion order
        // and duplicate names.
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = Vec::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.push(Header::new(name.as_str(), v));
            }
        }

        Ok(RawResponse::new(
            status,
            reason,
            headers,
            Box::new(ReqwestBody { inner: response }),
        ))
    }
}

/// Unread reqwest response body. Dropping it returns the connection to the
/// client's pool without reading the remaining bytes.
struct ReqwestBody {
    inner: reqwest::Response,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn text(self: Box<Self>) -> Result<String, TransportError> {
        Ok(self.inner.text().await?)
    }
}

/// Mock transport for tests.
///
/// Captures outgoing requests, returns a configured reply, and tracks
/// connection acquisition/release through a [`mock::ConnectionLedger`] so
/// leak behavior can be asserted on every exit path.
#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    /// Counts connections a [`MockTransport`] has opened and not yet released.
    #[derive(Clone, Default)]
    pub struct ConnectionLedger {
        open: Arc<AtomicUsize>,
        opened_total: Arc<AtomicUsize>,
    }

    impl ConnectionLedger {
        fn connect(&self) -> ConnectionGuard {
            self.open.fetch_add(1, Ordering::SeqCst);
            self.opened_total.fetch_add(1, Ordering::SeqCst);
            ConnectionGuard {
                open: self.open.clone(),
            }
        }

        /// Connections currently held open.
        pub fn open(&self) -> usize {
            self.open.load(Ordering::SeqCst)
        }

        /// Connections ever opened.
        pub fn opened_total(&self) -> usize {
            self.opened_total.load(Ordering::SeqCst)
        }
    }

    /// Releases its ledger slot on drop, however the exchange ended.
    struct ConnectionGuard {
        open: Arc<AtomicUsize>,
    }

    impl Drop for ConnectionGuard {
        fn drop(&mut self) {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone)]
    struct MockReply {
        status: u16,
        reason: String,
        body: String,
    }

    /// A scriptable [`Transport`] double.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        reply: Arc<Mutex<Option<MockReply>>>,
        failure: Arc<Mutex<Option<String>>>,
        delay: Arc<Mutex<Option<Duration>>>,
        recorded: Arc<Mutex<Vec<HttpRequest>>>,
        ledger: ConnectionLedger,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reply to every request with the given status, reason, and body.
        pub fn with_reply(
            self,
            status: u16,
            reason: impl Into<String>,
            body: impl Into<String>,
        ) -> Self {
            *self.reply.lock().unwrap() = Some(MockReply {
                status,
                reason: reason.into(),
                body: body.into(),
            });
            self
        }

        /// Reply 200 OK with the given JSON body.
        pub fn with_json(self, body: serde_json::Value) -> Self {
            self.with_reply(200, "OK", body.to_string())
        }

        /// Fail every request after acquiring a connection.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.failure.lock().unwrap() = Some(message.into());
            self
        }

        /// Sleep before replying, to exercise timeout handling.
        pub fn with_delay(self, delay: Duration) -> Self {
            *self.delay.lock().unwrap() = Some(delay);
            self
        }

        /// All requests seen so far, in order.
        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded.lock().unwrap().clone()
        }

        pub fn ledger(&self) -> ConnectionLedger {
            self.ledger.clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
            self.recorded.lock().unwrap().push(request);

            let guard = self.ledger.connect();

            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let failure = self.failure.lock().unwrap().clone();
            if let Some(message) = failure {
                return Err(TransportError::Other(message));
            }

            let reply = self.reply.lock().unwrap().clone().unwrap_or(MockReply {
                status: 200,
                reason: "OK".to_string(),
                body: "null".to_string(),
            });

            Ok(RawResponse::new(
                reply.status,
                reply.reason,
                Vec::new(),
                Box::new(MockBody {
                    text: reply.body,
                    _guard: guard,
                }),
            ))
        }
    }

    /// Holds the connection slot until the body is read or dropped.
    struct MockBody {
        text: String,
        _guard: ConnectionGuard,
    }

    #[async_trait]
    impl ResponseBody for MockBody {
        async fn text(self: Box<Self>) -> Result<String, TransportError> {
            Ok(self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use http::Method;
    use url::Url;

    fn request(method: Method, url: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: Url::parse(url).unwrap(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn mock_returns_configured_reply() {
        let transport = MockTransport::new().with_reply(201, "Created", r#"{"id":1}"#);

        let response = transport
            .send(request(Method::POST, "http://example.com/items"))
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.reason(), "Created");
        assert_eq!(response.text().await.unwrap(), r#"{"id":1}"#);
    }

    #[tokio::test]
    async fn mock_records_requests_in_order() {
        let transport = MockTransport::new();

        transport
            .send(request(Method::GET, "http://example.com/first"))
            .await
            .unwrap();
        transport
            .send(request(Method::DELETE, "http://example.com/second"))
            .await
            .unwrap();

        let recorded = transport.recorded_requests();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].method, Method::GET);
        assert_eq!(recorded[0].url.path(), "/first");
        assert_eq!(recorded[1].method, Method::DELETE);
    }

    #[tokio::test]
    async fn mock_fails_when_configured() {
        let transport = MockTransport::new().fail_with("connection reset");

        let result = transport
            .send(request(Method::GET, "http://example.com"))
            .await;

        match result {
            Err(TransportError::Other(message)) => assert_eq!(message, "connection reset"),
            other => panic!("expected transport failure, got {other:?}"),
        }
        assert_eq!(transport.ledger().open(), 0);
    }

    #[tokio::test]
    async fn mock_releases_connection_after_body_read() {
        let transport = MockTransport::new().with_json(serde_json::json!({"ok": true}));
        let ledger = transport.ledger();

        let response = transport
            .send(request(Method::GET, "http://example.com"))
            .await
            .unwrap();
        assert_eq!(ledger.open(), 1);

        response.text().await.unwrap();
        assert_eq!(ledger.open(), 0);
        assert_eq!(ledger.opened_total(), 1);
    }
}
