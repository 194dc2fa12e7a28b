//! Inbound frames.

/// Opcode of a text frame.
const TEXT_OPCODE: u8 = 0x1;
/// Opcode of a binary frame.
const BINARY_OPCODE: u8 = 0x2;

/// Payload kind tag as received from the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text payload.
    Text,
    /// Binary payload.
    Binary,
    /// Any other frame opcode. Never valid as inbound content.
    Other(u8),
}

impl FrameKind {
    /// Classify a raw frame opcode.
    pub fn from_opcode(opcode: u8) -> Self {
        match opcode {
            TEXT_OPCODE => Self::Text,
            BINARY_OPCODE => Self::Binary,
            other => Self::Other(other),
        }
    }

    /// Payload kind for renderable frames, or the offending opcode.
    pub fn payload_kind(self) -> Result<PayloadKind, u8> {
        match self {
            Self::Text => Ok(PayloadKind::Text),
            Self::Binary => Ok(PayloadKind::Binary),
            Self::Other(opcode) => Err(opcode),
        }
    }
}

/// Renderable payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Rendered as-is.
    Text,
    /// Rendered as grouped hex.
    Binary,
}

/// One message received from the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Payload kind tag.
    pub kind: FrameKind,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl InboundFrame {
    /// Text frame.
    pub fn text(text: impl Into<String>) -> Self {
        Self { kind: FrameKind::Text, payload: text.into().into_bytes() }
    }

    /// Binary frame.
    pub fn binary(payload: impl Into<Vec<u8>>) -> Self {
        Self { kind: FrameKind::Binary, payload: payload.into() }
    }
}
