//! The fluent request sender.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, TransportError};
use crate::response::RawResponse;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Header, HttpRequest};

/// Timeout applied to every exchange unless overridden with
/// [`RequestSender::set_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// A mutable request configuration with fluent setters and verb operations.
///
/// The sender holds a target URL, an ordered list of headers, and a timeout.
/// Setters return `&mut Self` so configuration chains; each verb call reads
/// the configuration current at the moment it starts and performs exactly one
/// request/response exchange against the sender's transport.
///
/// ```no_run
/// use fluent_http::RequestSender;
/// use serde::Deserialize;
/// use std::time::Duration;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), fluent_http::Error> {
/// let mut sender = RequestSender::new();
/// sender
///     .set_url("https://api.example.com/users/1")
///     .add_header("Accept", "application/json")
///     .set_timeout(Duration::from_secs(5));
///
/// let user: User = sender.get().await?;
/// # Ok(())
/// # }
/// ```
///
/// # Concurrency
///
/// Setters take `&mut self` and verbs take `&self`, so configuration cannot
/// change under an in-flight call on the same instance. To issue requests
/// concurrently, clone the configured sender (clones share the transport) or
/// synchronize externally; there is no ordering guarantee between concurrent
/// calls.
#[derive(Clone)]
pub struct RequestSender {
    url: Option<String>,
    headers: Vec<Header>,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl RequestSender {
    /// A sender with no URL, no headers, the default timeout, and a reqwest
    /// transport of its own.
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }

    /// A sender using the given transport. The seam for test doubles.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            url: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            transport: Arc::new(transport),
        }
    }

    /// Replace the target URL unconditionally.
    ///
    /// The value is not validated here; a URL that does not parse as an
    /// absolute URL fails the next verb call with [`Error::MalformedUrl`].
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    /// Append a header. Headers are never removed or overwritten; adding the
    /// same name twice sends it twice, in insertion order.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Replace the per-exchange timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// The configured URL, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Configured headers in insertion order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a GET and return the raw body text on a 2xx status.
    ///
    /// Non-2xx fails with [`Error::Status`] carrying the code and reason;
    /// network failure or timeout fails with [`Error::Transport`].
    pub async fn get_text(&self) -> Result<String, Error> {
        let request = self.build(Method::GET, None)?;
        self.exchange(request).await
    }

    /// Issue a GET and deserialize the JSON response body into `T`.
    pub async fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let request = self.build(Method::GET, None)?;
        self.exchange_typed(request).await
    }

    /// Issue a GET and return the full response without status validation or
    /// body consumption.
    ///
    /// The caller reads the body at most once via [`RawResponse::text`]; the
    /// underlying connection is released whether the body is read, the
    /// response is dropped, or the call fails.
    pub async fn get_response(&self) -> Result<RawResponse, Error> {
        let request = self.build(Method::GET, None)?;
        self.dispatch(request).await
    }

    /// Issue a POST with `body` serialized as the JSON request body and
    /// deserialize the JSON response into `TResp`.
    pub async fn post<TResp, TReq>(&self, body: &TReq) -> Result<TResp, Error>
    where
        TResp: DeserializeOwned,
        TReq: Serialize + ?Sized,
    {
        let request = self.build_with_body(Method::POST, body)?;
        self.exchange_typed(request).await
    }

    /// Issue a PUT with `body` serialized as the JSON request body and
    /// deserialize the JSON response into `TResp`.
    pub async fn put<TResp, TReq>(&self, body: &TReq) -> Result<TResp, Error>
    where
        TResp: DeserializeOwned,
        TReq: Serialize + ?Sized,
    {
        let request = self.build_with_body(Method::PUT, body)?;
        self.exchange_typed(request).await
    }

    /// Issue a DELETE to `{url}/{key}` and deserialize the JSON response into
    /// `T`.
    pub async fn delete<T: DeserializeOwned>(&self, key: impl fmt::Display) -> Result<T, Error> {
        let request = self.build_keyed(Method::DELETE, &key)?;
        self.exchange_typed(request).await
    }

    /// Issue a DELETE to `{url}/{key}`, discarding the response body.
    ///
    /// Completes with `Ok(())` on any 2xx status. Callers that need a
    /// different success policy use [`RequestSender::delete_response`] and
    /// inspect the status themselves.
    pub async fn delete_discard(&self, key: impl fmt::Display) -> Result<(), Error> {
        let request = self.build_keyed(Method::DELETE, &key)?;
        self.exchange(request).await?;
        Ok(())
    }

    /// Issue a DELETE to `{url}/{key}` and return the full response without
    /// status validation, as [`RequestSender::get_response`] does for GET.
    pub async fn delete_response(&self, key: impl fmt::Display) -> Result<RawResponse, Error> {
        let request = self.build_keyed(Method::DELETE, &key)?;
        self.dispatch(request).await
    }

    /// Parse the configured URL. An unset URL parses as the empty string and
    /// fails the same way an invalid one does.
    fn parse_url(&self, raw: &str) -> Result<Url, Error> {
        Url::parse(raw).map_err(|source| Error::MalformedUrl {
            url: raw.to_string(),
            source,
        })
    }

    fn build(&self, method: Method, body: Option<serde_json::Value>) -> Result<HttpRequest, Error> {
        let url = self.parse_url(self.url.as_deref().unwrap_or(""))?;
        Ok(HttpRequest {
            method,
            url,
            headers: self.headers.clone(),
            body,
        })
    }

    fn build_with_body<TReq>(&self, method: Method, body: &TReq) -> Result<HttpRequest, Error>
    where
        TReq: Serialize + ?Sized,
    {
        let url = self.parse_url(self.url.as_deref().unwrap_or(""))?;
        let body = serde_json::to_value(body).map_err(|source| Error::Serialize {
            method: method.clone(),
            url: url.to_string(),
            source,
        })?;
        Ok(HttpRequest {
            method,
            url,
            headers: self.headers.clone(),
            body: Some(body),
        })
    }

    fn build_keyed(&self, method: Method, key: &dyn fmt::Display) -> Result<HttpRequest, Error> {
        let base = self.url.as_deref().unwrap_or("");
        let keyed = format!("{base}/{key}");
        let url = self.parse_url(&keyed)?;
        Ok(HttpRequest {
            method,
            url,
            headers: self.headers.clone(),
            body: None,
        })
    }

    /// Send a built request through the transport under the configured
    /// timeout. Exceeding the timeout drops the in-flight transport future,
    /// releasing whatever resources it held.
    async fn dispatch(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        let method = request.method.clone();
        let url = request.url.to_string();

        tracing::debug!(method = %method, url = %url, "sending request");

        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(source)) => Err(Error::Transport {
                method,
                url,
                source,
            }),
            Err(_) => Err(Error::Transport {
                method,
                url,
                source: TransportError::Timeout {
                    limit: self.timeout,
                },
            }),
        }
    }

    /// One status-checked exchange: dispatch, require 2xx, read the body.
    async fn exchange(&self, request: HttpRequest) -> Result<String, Error> {
        let method = request.method.clone();
        let url = request.url.to_string();

        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(Error::Status {
                method,
                url,
                status: response.status(),
                reason: response.reason().to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| Error::Transport {
                method,
                url,
                source,
            })
    }

    async fn exchange_typed<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, Error> {
        let method = request.method.clone();
        let url = request.url.to_string();

        let text = self.exchange(request).await?;
        serde_json::from_str(&text).map_err(|source| {
            tracing::warn!(method = %method, url = %url, error = %source, "response body did not match the requested type");
            Error::Deserialize {
                method,
                url,
                source,
            }
        })
    }
}

impl Default for RequestSender {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSender")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
