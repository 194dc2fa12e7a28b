//! Inbound rendering.

use std::io;

use crossterm::style::Stylize;

use crate::Printer;

/// Prefix marking inbound lines.
pub const INBOUND_MARKER: &str = "< ";

/// Write one inbound message as a marked line.
///
/// With `color`, the marker and text are green. The line terminator is always
/// `\n`; printers translate it for the terminal mode they run in.
pub fn write_inbound<P: Printer + ?Sized>(out: &mut P, text: &str, color: bool) -> io::Result<()> {
    let line = format!("{INBOUND_MARKER}{text}");

    if color { out.print(&format!("{}\n", line.green())) } else { out.print(&format!("{line}\n")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture(Vec<String>);

    impl Printer for Capture {
        fn print(&mut self, text: &str) -> io::Result<()> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn plain_line_is_marked() {
        let mut out = Capture::default();
        write_inbound(&mut out, "hello", false).unwrap();
        assert_eq!(out.0, vec!["< hello\n"]);
    }

    #[test]
    fn colored_line_wraps_marker_and_text() {
        let mut out = Capture::default();
        write_inbound(&mut out, "hello", true).unwrap();

        // crossterm drops the escapes itself when NO_COLOR is set
        let line = &out.0[0];
        assert!(line.contains("< hello"));
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }
}
