use http::Method;
use url::Url;

/// A single request header as an ordered name/value pair.
///
/// Headers are kept in a plain list rather than a map: insertion order is
/// replayed identically onto the outgoing request, and duplicate names are
/// appended, never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A fully built outgoing request, handed to a [`Transport`] for execution.
///
/// The URL has already been parsed by the time a transport sees it; transports
/// never deal with malformed URLs.
///
/// [`Transport`]: crate::transport::Transport
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE).
    pub method: Method,

    /// Absolute request URL.
    pub url: Url,

    /// Headers in insertion order, duplicates included.
    pub headers: Vec<Header>,

    /// JSON request body, attached with `Content-Type: application/json`.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Look up the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
