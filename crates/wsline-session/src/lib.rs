//! Session core for wsline
//!
//! Bridges a line-oriented terminal with a message connection. Two loops run
//! as independent tasks: one reads console entries and sends them, the other
//! receives inbound frames and renders them above the prompt. The first loop
//! to fail ends the session, and its error is the session's result.
//!
//! # Components
//!
//! - [`Session`]: Coordinator owning both loops and the teardown order
//! - [`run_session`]: Connect, open the editor, run, return the condition
//! - [`read_entry`]: One console entry in single-line or multi-line mode
//! - [`format_payload`]: Text passthrough and grouped hex for binary payloads
//! - [`FrameSink`], [`FrameSource`], [`Connector`]: Connection seams
//! - [`LineEditor`], [`Printer`]: Terminal seams
//!
//! The crate never constructs a runtime and never touches a real socket or
//! terminal; those are supplied through the traits above.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod console;
mod editor;
mod error;
mod format;
mod frame;
mod render;
mod session;

pub use connection::{ConnectRequest, Connector, FrameSink, FrameSource};
pub use console::{ConsoleEntry, ReadMode, read_entry};
pub use editor::{LineEditor, Printer};
pub use error::{EditorError, SessionError, TransportError};
pub use format::{format_payload, grouped_hex};
pub use frame::{FrameKind, InboundFrame, PayloadKind};
pub use render::{INBOUND_MARKER, write_inbound};
pub use session::{Session, SessionOptions, run_session};
