//! Connection abstraction.
//!
//! A connection is split into a write half ([`FrameSink`]) used by the
//! console loop and the coordinator's teardown, and a read half
//! ([`FrameSource`]) used only by the connection loop. Single writer, single
//! reader.

use std::future::Future;

use crate::{InboundFrame, TransportError};

/// Header carrying the handshake origin.
const ORIGIN_HEADER: &str = "Origin";

/// Everything needed to dial a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Target URL.
    pub url: String,
    /// Handshake headers in insertion order.
    pub headers: Vec<(String, String)>,
}

impl ConnectRequest {
    /// Request for `url` with no headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), headers: Vec::new() }
    }

    /// Add an `Origin` header.
    pub fn with_origin(self, origin: impl Into<String>) -> Self {
        self.with_header(ORIGIN_HEADER, origin)
    }

    /// Add a handshake header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the `Origin` header, if set.
    pub fn origin(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(ORIGIN_HEADER))
            .map(|(_, value)| value.as_str())
    }
}

/// Write half of a connection.
pub trait FrameSink: Send + 'static {
    /// Send a text message.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Send a normal-closure control message and flush.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Read half of a connection.
pub trait FrameSource: Send + 'static {
    /// Wait for the next inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] when the peer closes the
    /// connection and [`TransportError::Stream`] on any other failure.
    fn recv(&mut self) -> impl Future<Output = Result<InboundFrame, TransportError>> + Send;
}

/// Dials connections.
pub trait Connector: Sync {
    /// Write half type.
    type Sink: FrameSink;
    /// Read half type.
    type Source: FrameSource;

    /// Establish a connection, performing any handshake.
    fn connect(
        &self,
        request: &ConnectRequest,
    ) -> impl Future<Output = Result<(Self::Sink, Self::Source), TransportError>> + Send;
}
