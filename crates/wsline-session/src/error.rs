//! Session error types.

use std::io;

use thiserror::Error;

/// Close code for a normal closure.
const NORMAL_CLOSURE: u16 = 1000;

/// Connection errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The peer closed the connection.
    ///
    /// `code` is 1005 when the close frame carried no status code.
    #[error("connection closed (code {code}){}", format_reason(.reason))]
    Closed {
        /// Close status code.
        code: u16,
        /// Close reason, possibly empty.
        reason: String,
    },

    /// Send or receive failed on an established connection.
    #[error("stream error: {0}")]
    Stream(String),
}

fn format_reason(reason: &str) -> String {
    if reason.is_empty() { String::new() } else { format!(": {reason}") }
}

/// Line editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The user pressed the interrupt key. Recovered by the console reader.
    #[error("interrupted")]
    Interrupted,

    /// End of input (Ctrl-D on an empty line).
    #[error("end of input")]
    Eof,

    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The condition that ended a session.
///
/// Exactly one is produced per session. Setup failures ([`Self::Connect`],
/// [`Self::Terminal`]) are returned before any loop starts; everything else
/// comes from whichever loop failed first.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Establishing the connection failed.
    #[error("connect: {0}")]
    Connect(#[source] TransportError),

    /// Opening the line editor failed.
    #[error("terminal setup: {0}")]
    Terminal(#[source] EditorError),

    /// Reading console input failed.
    #[error("console: {0}")]
    Input(#[source] EditorError),

    /// Sending or receiving on the connection failed.
    #[error("{0}")]
    Transport(#[source] TransportError),

    /// The peer sent a frame that is neither text nor binary.
    #[error("unknown websocket frame type: {0}")]
    UnknownFrameKind(u8),

    /// Writing inbound output to the terminal failed.
    #[error("terminal output: {0}")]
    Output(#[source] io::Error),

    /// A session loop stopped without reporting a condition (panic).
    #[error("session task failed: {0}")]
    Task(String),
}

impl SessionError {
    /// Whether the session ended the way a user expects it to end.
    ///
    /// True for end of console input and for a normal close from the peer.
    pub fn is_clean_exit(&self) -> bool {
        matches!(
            self,
            Self::Input(EditorError::Eof)
                | Self::Transport(TransportError::Closed { code: NORMAL_CLOSURE, .. })
        )
    }
}
