use std::time::Duration;

use http::Method;

/// Failure at the transport layer, before any HTTP response was obtained.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The configured timeout elapsed before the exchange completed.
    #[error("timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// Network-level failure from the HTTP client (DNS, connect, TLS, read).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a non-reqwest transport implementation.
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by verb operations.
///
/// Each variant carries the operation context (method and URL) so failures can
/// be attributed without the caller re-deriving it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No response was obtained: DNS, connection, or timeout failure.
    #[error("{method} {url}: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: TransportError,
    },

    /// A response was obtained but its status code is outside the 2xx range.
    #[error("{method} {url}: HTTP {status} {reason}")]
    Status {
        method: Method,
        url: String,
        status: u16,
        reason: String,
    },

    /// The response body could not be parsed into the requested type.
    #[error("{method} {url}: invalid response body: {source}")]
    Deserialize {
        method: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized to JSON.
    #[error("{method} {url}: invalid request body: {source}")]
    Serialize {
        method: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured URL (or the `{url}/{key}` composite for DELETE) is not
    /// a valid absolute URL. Raised when the request is built, not when the
    /// URL is configured.
    #[error("invalid request URL {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The blocking runtime could not be started.
    #[cfg(feature = "blocking")]
    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    /// True if this failure was the configured timeout elapsing.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Transport {
                source: TransportError::Timeout { .. },
                ..
            }
        )
    }

    /// The HTTP status code, for [`Error::Status`] failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
