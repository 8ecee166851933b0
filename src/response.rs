//! Raw responses with unconsumed, read-once bodies.

use std::fmt;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::Header;

/// An unconsumed response body.
///
/// Reading takes `Box<Self>` so the body can be consumed at most once.
/// Implementations hold whatever connection or stream resource backs the
/// body; dropping the box releases it, so the resource is returned on every
/// exit path whether or not the body was read.
#[async_trait]
pub trait ResponseBody: Send {
    /// Read the entire body as text, consuming it.
    async fn text(self: Box<Self>) -> Result<String, TransportError>;
}

/// A full HTTP response: status, reason phrase, headers, and an unread body.
///
/// Returned by [`RequestSender::get_response`] and
/// [`RequestSender::delete_response`] without any status-code validation —
/// the caller decides what counts as success. The body is read at most once
/// via [`RawResponse::text`]; dropping the response unread still releases the
/// underlying transport resource.
///
/// [`RequestSender::get_response`]: crate::sender::RequestSender::get_response
/// [`RequestSender::delete_response`]: crate::sender::RequestSender::delete_response
pub struct RawResponse {
    status: u16,
    reason: String,
    headers: Vec<Header>,
    body: Box<dyn ResponseBody>,
}

impl RawResponse {
    pub fn new(
        status: u16,
        reason: impl Into<String>,
        headers: Vec<Header>,
        body: Box<dyn ResponseBody>,
    ) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase (e.g. "OK", "Not Found").
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Response headers in the order the transport produced them.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Look up the first response header with the given name
    /// (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// True for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for 4xx status codes.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// True for 5xx status codes.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Read the body as text, consuming the response.
    pub async fn text(self) -> Result<String, TransportError> {
        self.body.text().await
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
