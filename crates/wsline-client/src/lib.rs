//! WebSocket transport for wsline
//!
//! Implements the [`wsline_session`] connection seams on top of
//! `tokio-tungstenite`:
//! - [`transport::WsConnector`]: dials with handshake headers, optionally
//!   without certificate verification
//! - [`transport::WsSink`]: text messages and the normal-closure handshake
//! - [`transport::WsSource`]: inbound frames, skipping control traffic

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod transport;

pub use transport::{TransportConfig, WsConnector, WsSink, WsSource, connect, http_to_ws_scheme};
