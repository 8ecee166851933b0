//! Blocking façade over the async sender.
//!
//! Owns a single-threaded tokio runtime and drives the async verbs to
//! completion on the calling thread. Raw streaming responses stay async-only;
//! every blocking verb returns fully read data.
//!
//! Must not be used from inside an async runtime — call the async
//! [`RequestSender`](crate::RequestSender) there instead.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::error::Error;
use crate::transport::Transport;
use crate::types::Header;

/// Blocking counterpart of [`crate::RequestSender`].
///
/// Identical configuration surface and verb contracts; each verb blocks the
/// calling thread until the exchange completes or fails.
pub struct RequestSender {
    inner: crate::RequestSender,
    runtime: Runtime,
}

impl RequestSender {
    pub fn new() -> Result<Self, Error> {
        Self::wrap(crate::RequestSender::new())
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Result<Self, Error> {
        Self::wrap(crate::RequestSender::with_transport(transport))
    }

    fn wrap(inner: crate::RequestSender) -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.inner.set_url(url);
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.add_header(name, value);
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.inner.set_timeout(timeout);
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.inner.url()
    }

    pub fn headers(&self) -> &[Header] {
        self.inner.headers()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout()
    }

    pub fn get_text(&self) -> Result<String, Error> {
        self.runtime.block_on(self.inner.get_text())
    }

    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.runtime.block_on(self.inner.get())
    }

    pub fn post<TResp, TReq>(&self, body: &TReq) -> Result<TResp, Error>
    where
        TResp: DeserializeOwned,
        TReq: Serialize + ?Sized,
    {
        self.runtime.block_on(self.inner.post(body))
    }

    pub fn put<TResp, TReq>(&self, body: &TReq) -> Result<TResp, Error>
    where
        TResp: DeserializeOwned,
        TReq: Serialize + ?Sized,
    {
        self.runtime.block_on(self.inner.put(body))
    }

    pub fn delete<T: DeserializeOwned>(&self, key: impl fmt::Display) -> Result<T, Error> {
        self.runtime.block_on(self.inner.delete(key))
    }

    pub fn delete_discard(&self, key: impl fmt::Display) -> Result<(), Error> {
        self.runtime.block_on(self.inner.delete_discard(key))
    }
}

impl fmt::Debug for RequestSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("blocking::RequestSender")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
