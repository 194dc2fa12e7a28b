//! Scripted collaborators for session tests.
//!
//! - [`ScriptedEditor`] replays a fixed list of read results, then blocks
//!   forever like a user who stopped typing.
//! - [`ChannelSource`] yields whatever the test pushes into its channel, and
//!   blocks forever once the channel is drained and dropped.
//! - [`RecordingSink`] records sent messages and close calls.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    future::pending,
    io,
    sync::{Arc, Mutex},
};

use tokio::sync::mpsc;
use wsline_session::{
    ConnectRequest, Connector, EditorError, FrameSink, FrameSource, InboundFrame, LineEditor,
    Printer, TransportError,
};

/// Shared record of printed output.
#[derive(Clone, Default)]
pub struct Screen(Arc<Mutex<Vec<String>>>);

impl Screen {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Printer for Screen {
    fn print(&mut self, text: &str) -> io::Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Printer whose terminal is gone.
#[derive(Clone)]
pub struct BrokenScreen;

impl Printer for BrokenScreen {
    fn print(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty closed"))
    }
}

/// Editor replaying scripted read results.
pub struct ScriptedEditor<P = Screen> {
    script: VecDeque<Result<String, EditorError>>,
    printer: P,
    released: Arc<Mutex<bool>>,
}

impl ScriptedEditor<Screen> {
    pub fn new(script: Vec<Result<String, EditorError>>) -> Self {
        Self::with_printer(script, Screen::default())
    }
}

impl<P: Printer + Clone> ScriptedEditor<P> {
    pub fn with_printer(script: Vec<Result<String, EditorError>>, printer: P) -> Self {
        Self { script: script.into(), printer, released: Arc::new(Mutex::new(false)) }
    }

    /// Flag set once the editor has been dropped.
    pub fn released(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.released)
    }
}

impl<P> Drop for ScriptedEditor<P> {
    fn drop(&mut self) {
        if let Ok(mut released) = self.released.lock() {
            *released = true;
        }
    }
}

impl<P: Printer + Clone> LineEditor for ScriptedEditor<P> {
    type Printer = P;

    async fn read_line(&mut self) -> Result<String, EditorError> {
        match self.script.pop_front() {
            Some(result) => result,
            None => pending().await,
        }
    }

    fn printer(&self) -> P {
        self.printer.clone()
    }
}

/// Lines for a script.
pub fn lines(lines: &[&str]) -> Vec<Result<String, EditorError>> {
    lines.iter().map(|line| Ok((*line).to_string())).collect()
}

/// What a [`RecordingSink`] observed.
#[derive(Debug, Default)]
pub struct SinkLog {
    pub sent: Vec<String>,
    pub closes: usize,
}

/// Sink recording traffic, optionally failing every send.
#[derive(Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<SinkLog>>,
    fail_sends: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self { fail_sends: true, ..Self::default() }
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }
}

impl FrameSink for RecordingSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Stream("broken pipe".into()));
        }
        self.log.lock().unwrap().sent.push(text);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Source fed by the test through a channel.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Result<InboundFrame, TransportError>>,
}

impl FrameSource for ChannelSource {
    async fn recv(&mut self) -> Result<InboundFrame, TransportError> {
        match self.rx.recv().await {
            Some(result) => result,
            None => pending().await,
        }
    }
}

/// Source with its feeding end.
pub fn channel_source() -> (mpsc::UnboundedSender<Result<InboundFrame, TransportError>>, ChannelSource)
{
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, ChannelSource { rx })
}

/// Source preloaded with `items` that then stays silent.
pub fn scripted_source(items: Vec<Result<InboundFrame, TransportError>>) -> ChannelSource {
    let (tx, source) = channel_source();
    for item in items {
        tx.send(item).unwrap();
    }
    source
}

/// Connector handing out one prepared connection.
pub struct OneShotConnector {
    halves: Mutex<Option<Result<(RecordingSink, ChannelSource), TransportError>>>,
    requests: Mutex<Vec<ConnectRequest>>,
}

impl OneShotConnector {
    pub fn new(sink: RecordingSink, source: ChannelSource) -> Self {
        Self { halves: Mutex::new(Some(Ok((sink, source)))), requests: Mutex::new(Vec::new()) }
    }

    pub fn failing(error: TransportError) -> Self {
        Self { halves: Mutex::new(Some(Err(error))), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<ConnectRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Connector for OneShotConnector {
    type Sink = RecordingSink;
    type Source = ChannelSource;

    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<(RecordingSink, ChannelSource), TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.halves
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(TransportError::Connection("already connected".into())))
    }
}
