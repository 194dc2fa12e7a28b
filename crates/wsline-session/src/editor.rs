//! Line editor abstraction.
//!
//! The session reads user input through [`LineEditor`] and writes inbound
//! output through its [`Printer`]. Implementations must serialize printer
//! output against an in-progress [`LineEditor::read_line`] so that inbound
//! text lands above the prompt rather than inside the user's pending input.
//!
//! Releasing the terminal is tied to dropping the editor.

use std::{future::Future, io};

use crate::EditorError;

/// Interactive line input.
pub trait LineEditor: Send + 'static {
    /// Output handle usable while a read is in progress.
    type Printer: Printer;

    /// Read one line, without its terminator.
    ///
    /// # Errors
    ///
    /// [`EditorError::Interrupted`] when the user presses the interrupt key,
    /// [`EditorError::Eof`] at end of input, [`EditorError::Io`] otherwise.
    fn read_line(&mut self) -> impl Future<Output = Result<String, EditorError>> + Send;

    /// Output handle sharing this editor's terminal.
    fn printer(&self) -> Self::Printer;
}

/// Writes to the editor's output stream.
pub trait Printer: Send + 'static {
    /// Write `text` verbatim above the prompt.
    fn print(&mut self, text: &str) -> io::Result<()>;
}
