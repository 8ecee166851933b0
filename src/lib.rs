//! # fluent-http
//!
//! A minimal fluent-builder client for issuing HTTP requests and
//! deserializing JSON responses into typed objects.
//!
//! The whole surface is one configuration object, [`RequestSender`]: set a
//! URL, append headers, pick a timeout, then call one of the verb operations
//! (GET, POST, PUT, DELETE). Request bodies are serialized to JSON with
//! `Content-Type: application/json`; responses are read as text and parsed
//! into the requested type.
//!
//! ```no_run
//! use fluent_http::RequestSender;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewUser<'a> {
//!     name: &'a str,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), fluent_http::Error> {
//! let mut sender = RequestSender::new();
//! sender
//!     .set_url("https://api.example.com/users")
//!     .add_header("Authorization", "Bearer token");
//!
//! let created: User = sender.post(&NewUser { name: "Alice" }).await?;
//! let removed: User = sender.delete(created.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every verb is all-or-nothing and fails with one of four kinds, each
//! carrying the method and URL it belongs to: [`Error::Transport`] (network,
//! DNS, timeout), [`Error::Status`] (non-2xx response, with code and reason),
//! [`Error::Deserialize`] / [`Error::Serialize`] (JSON conversion), and
//! [`Error::MalformedUrl`] (raised when the request is built). There are no
//! retries and no partial recovery.
//!
//! ## Transports
//!
//! Requests execute through the [`Transport`] trait; the default is a shared
//! [`ReqwestTransport`] owned by the sender. Tests substitute a double via
//! [`RequestSender::with_transport`] to capture outgoing requests or script
//! failures without a network.
//!
//! ## Blocking
//!
//! With the default `blocking` feature, [`blocking::RequestSender`] offers
//! the same surface on a thread that is not already inside an async runtime.

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod error;
pub mod response;
pub mod sender;
pub mod transport;
pub mod types;

pub use error::{Error, TransportError};
pub use response::{RawResponse, ResponseBody};
pub use sender::{RequestSender, DEFAULT_TIMEOUT};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Header, HttpRequest};
