//! Console entry reading.

use crate::{EditorError, LineEditor};

/// How console input is grouped into messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Every line is one message.
    #[default]
    SingleLine,
    /// Lines accumulate until a blank line; the block is one message.
    MultiLine,
}

/// Outcome of reading one console entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEntry {
    /// A deliverable message. May be empty.
    Message(String),
    /// The user interrupted the entry; nothing is sent.
    Skipped,
}

/// Read the next console entry.
///
/// An interrupt yields [`ConsoleEntry::Skipped`] in both modes; in multi-line
/// mode it also discards the lines gathered so far. Emptiness never means
/// skip: a blank first line in multi-line mode is an empty message.
///
/// # Errors
///
/// Any editor error other than [`EditorError::Interrupted`].
pub async fn read_entry<E: LineEditor>(
    editor: &mut E,
    mode: ReadMode,
) -> Result<ConsoleEntry, EditorError> {
    let read = match mode {
        ReadMode::SingleLine => editor.read_line().await,
        ReadMode::MultiLine => read_block(editor).await,
    };

    match read {
        Ok(message) => Ok(ConsoleEntry::Message(message)),
        Err(EditorError::Interrupted) => Ok(ConsoleEntry::Skipped),
        Err(e) => Err(e),
    }
}

/// Gather lines up to the first blank one, joined with `\n`.
async fn read_block<E: LineEditor>(editor: &mut E) -> Result<String, EditorError> {
    let mut lines = Vec::new();

    loop {
        let line = editor.read_line().await?;
        if line.is_empty() {
            return Ok(lines.join("\n"));
        }
        lines.push(line);
    }
}
