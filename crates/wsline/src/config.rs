//! Client configuration.
//!
//! Resolves command-line input into what the transport and the session need:
//! the dial URL, the handshake headers (a default `Origin` derived from the
//! URL), and the session options.

use std::ffi::OsStr;

use thiserror::Error;
use wsline_client::{TransportConfig, http_to_ws_scheme};
use wsline_session::{ConnectRequest, ReadMode, SessionOptions};

const ORIGIN_HEADER: &str = "Origin";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// URL cannot be dialed.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// URL as given.
        url: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Header is not of the form `Name: Value`.
    #[error("invalid header {0:?}: expected \"Name: Value\"")]
    InvalidHeader(String),
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket URL to dial.
    pub url: String,
    /// `Origin` header value.
    pub origin: String,
    /// Extra handshake headers, in order.
    pub headers: Vec<(String, String)>,
    /// How console lines are grouped into messages.
    pub read_mode: ReadMode,
    /// Render inbound lines in color.
    pub color: bool,
    /// Skip certificate verification.
    pub insecure: bool,
}

impl ClientConfig {
    /// Configuration for `url`, deriving the origin unless one is given.
    pub fn new(url: impl Into<String>, origin: Option<String>) -> Result<Self, ConfigError> {
        let url = http_to_ws_scheme(&url.into());
        let origin = match origin {
            Some(origin) => origin,
            None => default_origin(&url)?,
        };

        Ok(Self {
            url,
            origin,
            headers: Vec::new(),
            read_mode: ReadMode::default(),
            color: true,
            insecure: false,
        })
    }

    /// Add a raw `Name: Value` header.
    ///
    /// An `Origin` header replaces the configured origin, so the handshake
    /// carries exactly one.
    pub fn with_header(mut self, raw: &str) -> Result<Self, ConfigError> {
        let (name, value) = parse_header(raw)?;
        if name.eq_ignore_ascii_case(ORIGIN_HEADER) {
            self.origin = value;
        } else {
            self.headers.push((name, value));
        }
        Ok(self)
    }

    /// Handshake request for the transport.
    pub fn connect_request(&self) -> ConnectRequest {
        self.headers.iter().fold(
            ConnectRequest::new(self.url.clone()).with_origin(self.origin.clone()),
            |request, (name, value)| request.with_header(name.clone(), value.clone()),
        )
    }

    /// Options for the session loops.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions { read_mode: self.read_mode, color: self.color }
    }

    /// Options for the transport.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig { insecure: self.insecure }
    }
}

/// Origin matching a WebSocket URL: `ws` becomes `http`, `wss` becomes
/// `https`, host and port are kept, path and query are dropped.
pub fn default_origin(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason| ConfigError::InvalidUrl { url: url.to_string(), reason };

    let (scheme, rest) = if let Some(rest) = url.strip_prefix("ws://") {
        ("http", rest)
    } else if let Some(rest) = url.strip_prefix("wss://") {
        ("https", rest)
    } else {
        return Err(invalid("scheme must be ws, wss, http, or https"));
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(invalid("missing host"));
    }

    Ok(format!("{scheme}://{authority}"))
}

/// Split `Name: Value`, trimming whitespace around both parts.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let Some((name, value)) = raw.split_once(':') else {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Color is on unless `--no-color` is given or `NO_COLOR` is non-empty.
pub fn color_enabled(no_color_flag: bool, no_color_env: Option<&OsStr>) -> bool {
    !no_color_flag && no_color_env.is_none_or(OsStr::is_empty)
}
