//! Input state and key handling for the line editor.
//!
//! This module owns all text input state (buffer, cursor, history) and turns
//! key events into edit outcomes. It performs no I/O; the terminal layer
//! draws whatever state results.

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow (older history entry).
    Up,
    /// Down arrow (newer history entry).
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Ctrl-C.
    Interrupt,
    /// Ctrl-D.
    EndOfInput,
    /// Ctrl-U.
    ClearLine,
}

/// Result of applying one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Line still being edited; redraw it.
    Editing,
    /// Enter pressed; the line is complete.
    Submit(String),
    /// Ctrl-C; the pending line was discarded.
    Interrupted,
    /// Ctrl-D on an empty line.
    EndOfInput,
}

/// Input state for the line editor.
///
/// The cursor counts characters, not bytes. History holds submitted
/// non-empty lines for this process only.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer, in characters.
    cursor: usize,
    /// Previously submitted lines, oldest first.
    history: Vec<String>,
    /// History entry being shown, if browsing.
    history_pos: Option<usize>,
    /// Unsubmitted line saved when history browsing started.
    draft: String,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Submitted lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Apply a key.
    pub fn handle_key(&mut self, key: KeyInput) -> InputOutcome {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index();
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index();
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => self.delete_at_cursor(),
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Up => self.history_older(),
            KeyInput::Down => self.history_newer(),
            KeyInput::ClearLine => self.set_buffer(String::new()),
            KeyInput::Enter => return InputOutcome::Submit(self.submit()),
            KeyInput::Interrupt => {
                self.reset();
                return InputOutcome::Interrupted;
            },
            KeyInput::EndOfInput => {
                if self.buffer.is_empty() {
                    self.reset();
                    return InputOutcome::EndOfInput;
                }
                self.delete_at_cursor();
            },
        }

        InputOutcome::Editing
    }

    /// Take the line, recording it in history.
    fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.reset();

        if !line.is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        line
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_pos = None;
        self.draft.clear();
    }

    fn history_older(&mut self) {
        let Some(last) = self.history.len().checked_sub(1) else {
            return;
        };

        let pos = match self.history_pos {
            None => {
                self.draft = self.buffer.clone();
                last
            },
            Some(pos) => pos.saturating_sub(1),
        };

        self.history_pos = Some(pos);
        if let Some(line) = self.history.get(pos) {
            self.set_buffer(line.clone());
        }
    }

    fn history_newer(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };

        let next = pos.saturating_add(1);
        if let Some(line) = self.history.get(next) {
            self.history_pos = Some(next);
            self.set_buffer(line.clone());
        } else {
            self.history_pos = None;
            let draft = std::mem::take(&mut self.draft);
            self.set_buffer(draft);
        }
    }

    fn delete_at_cursor(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index();
            self.buffer.remove(at);
        }
    }

    fn set_buffer(&mut self, text: String) {
        self.buffer = text;
        self.cursor = self.len();
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }
}
