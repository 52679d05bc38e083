//! Error types for zwire.

use thiserror::Error;

/// Main error type for all zwire operations.
#[derive(Debug, Error)]
pub enum ZwireError {
    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame that cannot be decoded: buffer underrun, unknown message
    /// tag, bad dictionary entry, missing content frame, invalid UTF-8.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// A frame whose leading two bytes are not the expected protocol
    /// signature. Drives the garbage-tolerance loop in the socket.
    #[error("unexpected protocol signature 0x{0:04X}")]
    BadSignature(u16),

    /// Frame sequence broke the protocol contract (e.g. an address frame
    /// with nothing following it on a router endpoint).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A string, string array or dictionary exceeds its 1-byte length
    /// or count prefix at encode time.
    #[error("field too long: {0}")]
    FieldTooLong(String),

    /// Transport endpoint closed while a message was expected.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type alias using ZwireError.
pub type Result<T> = std::result::Result<T, ZwireError>;
