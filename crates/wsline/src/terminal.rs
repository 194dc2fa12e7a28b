//! Terminal line editor.
//!
//! Implements [`LineEditor`] with crossterm: raw mode, an async key event
//! stream, and a prompt line redrawn after every edit. [`ConsolePrinter`]
//! shares the screen state behind a mutex, so inbound output clears the
//! prompt line, prints, and redraws the pending input in one locked step.

use std::{
    io::{self, Write, stdout},
    sync::{Arc, Mutex, MutexGuard},
};

use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Print,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use wsline_session::{EditorError, LineEditor, Printer};

use crate::input::{InputOutcome, InputState, KeyInput};

/// Screen state shared by the editor and its printers.
struct Screen {
    out: Box<dyn Write + Send>,
    prompt: String,
    input: InputState,
    /// A read is in progress, so the prompt line is on screen.
    reading: bool,
}

impl Screen {
    fn new(out: Box<dyn Write + Send>, prompt: String) -> Self {
        Self { out, prompt, input: InputState::new(), reading: false }
    }

    /// Redraw the prompt line and place the cursor.
    fn draw_prompt(&mut self) -> io::Result<()> {
        let column = self.prompt.chars().count().saturating_add(self.input.cursor());
        self.out
            .queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(&self.prompt))?
            .queue(Print(self.input.buffer()))?
            .queue(MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)))?;
        self.out.flush()
    }

    /// End the prompt line after a read completes.
    fn finish_line(&mut self, marker: &str) -> io::Result<()> {
        self.reading = false;
        self.out.queue(Print(marker))?.queue(Print("\r\n"))?;
        self.out.flush()
    }

    /// Print `text` above the prompt.
    fn print_above(&mut self, text: &str) -> io::Result<()> {
        self.out
            .queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(raw_newlines(text)))?;

        if self.reading { self.draw_prompt() } else { self.out.flush() }
    }
}

/// Raw mode does not return the carriage on `\n`.
fn raw_newlines(text: &str) -> String {
    text.replace('\n', "\r\n")
}

/// Writer for output produced outside the editor, such as log lines.
///
/// Translates `\n` to `\r\n` so lines start at column zero while raw mode
/// is on. The prompt is redrawn on the next key press.
#[derive(Debug)]
pub struct RawModeWriter<W> {
    inner: W,
}

impl<W: Write> RawModeWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for RawModeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (i, chunk) in buf.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                self.inner.write_all(b"\r\n")?;
            }
            self.inner.write_all(chunk)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Lock the screen, surfacing poisoning as an I/O error.
fn lock(screen: &Mutex<Screen>) -> io::Result<MutexGuard<'_, Screen>> {
    screen.lock().map_err(|_| io::Error::other("terminal state poisoned"))
}

/// Raw-mode line editor on stdin/stdout.
///
/// Raw mode is entered on [`Console::open`] and left when the console is
/// dropped.
pub struct Console {
    events: EventStream,
    screen: Arc<Mutex<Screen>>,
}

impl Console {
    /// Enter raw mode and prepare a console with `prompt`.
    pub fn open(prompt: impl Into<String>) -> Result<Self, EditorError> {
        enable_raw_mode()?;

        let screen = Screen::new(Box::new(stdout()), prompt.into());

        Ok(Self { events: EventStream::new(), screen: Arc::new(Mutex::new(screen)) })
    }

    /// Apply one key under the screen lock.
    fn apply(&self, key: KeyInput) -> Result<InputOutcome, EditorError> {
        let mut screen = lock(&self.screen)?;
        let outcome = screen.input.handle_key(key);

        match &outcome {
            InputOutcome::Editing => screen.draw_prompt()?,
            InputOutcome::Submit(_) => screen.finish_line("")?,
            InputOutcome::Interrupted => screen.finish_line("^C")?,
            InputOutcome::EndOfInput => screen.finish_line("")?,
        }

        Ok(outcome)
    }

    /// Convert a crossterm key event to [`KeyInput`].
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(KeyInput::Interrupt),
                KeyCode::Char('d') => Some(KeyInput::EndOfInput),
                KeyCode::Char('u') => Some(KeyInput::ClearLine),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl LineEditor for Console {
    type Printer = ConsolePrinter;

    async fn read_line(&mut self) -> Result<String, EditorError> {
        {
            let mut screen = lock(&self.screen)?;
            screen.reading = true;
            screen.draw_prompt()?;
        }

        loop {
            let key = match self.events.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => key,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(EditorError::Io(e)),
                None => return Err(EditorError::Eof),
            };

            let Some(input) = Self::convert_key(key) else {
                continue;
            };

            match self.apply(input)? {
                InputOutcome::Editing => {},
                InputOutcome::Submit(line) => return Ok(line),
                InputOutcome::Interrupted => return Err(EditorError::Interrupted),
                InputOutcome::EndOfInput => return Err(EditorError::Eof),
            }
        }
    }

    fn printer(&self) -> ConsolePrinter {
        ConsolePrinter { screen: Arc::clone(&self.screen) }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        if let Ok(mut screen) = self.screen.lock()
            && screen.reading
        {
            let _ = screen.finish_line("");
        }
        let _ = disable_raw_mode();
    }
}

/// Printer writing above the console's prompt line.
#[derive(Clone)]
pub struct ConsolePrinter {
    screen: Arc<Mutex<Screen>>,
}

impl Printer for ConsolePrinter {
    fn print(&mut self, text: &str) -> io::Result<()> {
        lock(&self.screen)?.print_above(text)
    }
}
