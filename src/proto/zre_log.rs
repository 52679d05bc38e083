//! ZRE cluster event logging protocol.
//!
//! The message grammar:
//!
//! ```text
//!  LOG - Log an event
//!      level           number 1
//!      event           number 1
//!      node            number 2
//!      peer            number 2
//!      time            number 8
//!      message         string
//! ```

use crate::error::{Result, ZwireError};
use crate::message::{WireMessage, SIGNATURE_BASE};
use crate::socket::MessageSocket;
use crate::wire::{string_size, WireReader, WireWriter};

/// LOG wire tag.
pub const LOG: u8 = 1;

/// Log severity levels.
pub mod level {
    pub const ERROR: u8 = 1;
    pub const WARNING: u8 = 2;
    pub const INFO: u8 = 3;
    pub const DEBUG: u8 = 4;
    pub const TRACE: u8 = 5;
}

/// Logged cluster events.
pub mod event {
    pub const JOIN: u8 = 1;
    pub const LEAVE: u8 = 2;
    pub const ENTER: u8 = 3;
    pub const EXIT: u8 = 4;
}

/// A [`MessageSocket`] speaking the ZRE logging protocol.
pub type ZreLogSocket<T> = MessageSocket<ZreLogMsg, T>;

/// One ZRE logging protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZreLogMsg {
    /// Log an event.
    Log {
        level: u8,
        event: u8,
        node: u16,
        peer: u16,
        time: u64,
        message: String,
    },
}

impl WireMessage for ZreLogMsg {
    const SIGNATURE: u16 = SIGNATURE_BASE | 2;
    const PROTOCOL: &'static str = "zre-log";

    fn tag(&self) -> u8 {
        match self {
            ZreLogMsg::Log { .. } => LOG,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ZreLogMsg::Log { .. } => "LOG",
        }
    }

    fn body_size(&self) -> usize {
        match self {
            ZreLogMsg::Log { message, .. } => 1 + 1 + 2 + 2 + 8 + string_size(message),
        }
    }

    fn encode_body(&self, writer: &mut WireWriter) -> Result<()> {
        match self {
            ZreLogMsg::Log {
                level,
                event,
                node,
                peer,
                time,
                message,
            } => {
                writer.put_u8(*level);
                writer.put_u8(*event);
                writer.put_u16(*node);
                writer.put_u16(*peer);
                writer.put_u64(*time);
                writer.put_string(message)?;
            }
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut WireReader<'_>) -> Result<Self> {
        match tag {
            LOG => Ok(ZreLogMsg::Log {
                level: reader.get_u8()?,
                event: reader.get_u8()?,
                node: reader.get_u16()?,
                peer: reader.get_u16()?,
                time: reader.get_u64()?,
                message: reader.get_string()?,
            }),
            _ => Err(ZwireError::Malformed(format!(
                "unknown zre-log message tag {}",
                tag
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_roundtrip() {
        let log = ZreLogMsg::Log {
            level: level::INFO,
            event: event::JOIN,
            node: 123,
            peer: 123,
            time: 123,
            message: "Life is short but Now lasts for ever".into(),
        };

        let frame = log.encode_envelope().unwrap();
        assert_eq!(ZreLogMsg::decode_envelope(&frame).unwrap(), log);
    }

    #[test]
    fn test_log_envelope_layout() {
        let log = ZreLogMsg::Log {
            level: level::ERROR,
            event: event::EXIT,
            node: 0x0102,
            peer: 0x0304,
            time: 0x05060708090A0B0C,
            message: "x".into(),
        };
        let frame = log.encode_envelope().unwrap();
        assert_eq!(
            &frame[..],
            &[
                0xAA, 0xA2, LOG, // signature, tag
                0x01, 0x04, // level, event
                0x01, 0x02, 0x03, 0x04, // node, peer
                0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, // time
                0x01, b'x', // message
            ]
        );
    }

    #[test]
    fn test_grid_signature_not_accepted() {
        let mut writer = WireWriter::with_capacity(4);
        writer.put_u16(0xAAA1);
        writer.put_u8(LOG);
        let frame = writer.finish();
        assert!(matches!(
            ZreLogMsg::decode_envelope(&frame),
            Err(ZwireError::BadSignature(0xAAA1))
        ));
    }
}
