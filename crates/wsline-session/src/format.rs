//! Inbound payload formatting.

use crate::PayloadKind;

/// Display text for an inbound payload.
///
/// Text payloads are passed through (invalid UTF-8 is replaced, not
/// rejected). Binary payloads are rendered with [`grouped_hex`].
pub fn format_payload(kind: PayloadKind, payload: &[u8]) -> String {
    match kind {
        PayloadKind::Text => String::from_utf8_lossy(payload).into_owned(),
        PayloadKind::Binary => grouped_hex(payload),
    }
}

/// Lowercase hex with a space after every byte, trailing one included.
///
/// `[0xde, 0xad]` renders as `"de ad "`.
pub fn grouped_hex(payload: &[u8]) -> String {
    let encoded = hex::encode(payload);
    let mut grouped = String::with_capacity(payload.len() * 3);

    for (i, digit) in encoded.chars().enumerate() {
        grouped.push(digit);
        if i % 2 == 1 {
            grouped.push(' ');
        }
    }

    grouped
}
