//! Session coordinator.
//!
//! Lifecycle: connecting, running, terminating, closed.
//!
//! While running, the console loop and the connection loop are separate tasks
//! in one [`JoinSet`]. The set doubles as the termination slot: the first
//! task to finish carries the session's condition, the other is aborted and
//! awaited so it can neither publish a second condition nor touch the
//! handles afterwards.

use std::sync::Arc;

use tokio::{sync::Mutex, task::JoinSet};

use crate::{
    ConnectRequest, Connector, ConsoleEntry, EditorError, FrameSink, FrameSource, LineEditor,
    Printer, ReadMode, SessionError, format_payload, read_entry, write_inbound,
};

/// Options consumed by the session loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// How console lines are grouped into messages.
    pub read_mode: ReadMode,
    /// Render inbound lines in color.
    pub color: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { read_mode: ReadMode::SingleLine, color: true }
    }
}

/// A running pairing of a connection and a line editor.
pub struct Session<S, R, E>
where
    S: FrameSink,
    R: FrameSource,
    E: LineEditor,
{
    sink: Arc<Mutex<S>>,
    source: R,
    editor: E,
    options: SessionOptions,
}

impl<S, R, E> Session<S, R, E>
where
    S: FrameSink,
    R: FrameSource,
    E: LineEditor,
{
    /// Create a session from live handles.
    pub fn new(sink: S, source: R, editor: E, options: SessionOptions) -> Self {
        Self { sink: Arc::new(Mutex::new(sink)), source, editor, options }
    }

    /// Run both loops until the first terminating condition, then tear down.
    ///
    /// Teardown cancels the surviving loop (dropping the editor, which
    /// releases the terminal) and sends a normal closure on the connection.
    /// Teardown failures are logged and never replace the returned condition.
    pub async fn run(self) -> SessionError {
        let Self { sink, source, editor, options } = self;
        let printer = editor.printer();

        let mut loops = JoinSet::new();
        loops.spawn(console_loop(editor, Arc::clone(&sink), options.read_mode));
        loops.spawn(connection_loop(source, printer, options.color));
        tracing::debug!(mode = ?options.read_mode, "session running");

        let condition = match loops.join_next().await {
            Some(Ok(condition)) => condition,
            Some(Err(e)) => SessionError::Task(e.to_string()),
            None => SessionError::Task("no session loops were started".to_string()),
        };
        tracing::debug!(%condition, "session terminating");

        loops.shutdown().await;
        close_connection(&sink).await;
        tracing::debug!("session closed");

        condition
    }
}

/// Connect, open the line editor, and run a session to completion.
///
/// A connect failure returns before the editor is opened. An editor failure
/// still closes the freshly opened connection.
pub async fn run_session<C, E, F>(
    connector: &C,
    request: &ConnectRequest,
    open_editor: F,
    options: SessionOptions,
) -> SessionError
where
    C: Connector,
    E: LineEditor,
    F: FnOnce() -> Result<E, EditorError>,
{
    tracing::debug!(url = %request.url, origin = ?request.origin(), "session connecting");

    let (sink, source) = match connector.connect(request).await {
        Ok(halves) => halves,
        Err(e) => return SessionError::Connect(e),
    };

    let editor = match open_editor() {
        Ok(editor) => editor,
        Err(e) => {
            close_connection(&Mutex::new(sink)).await;
            return SessionError::Terminal(e);
        },
    };

    Session::new(sink, source, editor, options).run().await
}

/// Best-effort normal closure.
async fn close_connection<S: FrameSink>(sink: &Mutex<S>) {
    if let Err(e) = sink.lock().await.close().await {
        tracing::debug!(error = %e, "closing connection failed");
    }
}

/// Read console entries and send them until something fails.
async fn console_loop<E, S>(mut editor: E, sink: Arc<Mutex<S>>, mode: ReadMode) -> SessionError
where
    E: LineEditor,
    S: FrameSink,
{
    loop {
        let message = match read_entry(&mut editor, mode).await {
            Ok(ConsoleEntry::Message(message)) => message,
            Ok(ConsoleEntry::Skipped) => {
                tracing::trace!("console entry skipped");
                continue;
            },
            Err(e) => return SessionError::Input(e),
        };

        tracing::trace!(len = message.len(), "sending text message");
        if let Err(e) = sink.lock().await.send_text(message).await {
            return SessionError::Transport(e);
        }
    }
}

/// Receive frames and render them until something fails.
///
/// The read half is dropped when the loop returns.
async fn connection_loop<R, P>(mut source: R, mut printer: P, color: bool) -> SessionError
where
    R: FrameSource,
    P: Printer,
{
    loop {
        let frame = match source.recv().await {
            Ok(frame) => frame,
            Err(e) => return SessionError::Transport(e),
        };

        let kind = match frame.kind.payload_kind() {
            Ok(kind) => kind,
            Err(opcode) => return SessionError::UnknownFrameKind(opcode),
        };

        tracing::trace!(?kind, len = frame.payload.len(), "received message");
        let text = format_payload(kind, &frame.payload);
        if let Err(e) = write_inbound(&mut printer, &text, color) {
            return SessionError::Output(e);
        }
    }
}
