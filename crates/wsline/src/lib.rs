//! Interactive WebSocket client for the terminal
//!
//! A thin shell over [`wsline_session`]: this crate supplies the terminal
//! line editor and wires it to the WebSocket transport from
//! [`wsline_client`]. All session logic lives in [`wsline_session::Session`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod input;
pub mod terminal;

pub use config::{ClientConfig, ConfigError};
pub use terminal::{Console, ConsolePrinter, RawModeWriter};
use wsline_client::WsConnector;
use wsline_session::{SessionError, run_session};

/// Prompt shown while waiting for input.
pub const PROMPT: &str = "> ";

/// Connect and run one interactive session.
///
/// Returns the condition that ended the session.
pub async fn run(config: &ClientConfig) -> SessionError {
    let connector = WsConnector::new(config.transport_config());
    let request = config.connect_request();

    run_session(&connector, &request, || Console::open(PROMPT), config.session_options()).await
}
