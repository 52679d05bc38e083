//! ZRE peer-to-peer messaging protocol.
//!
//! The message grammar:
//!
//! ```text
//!  HELLO - Greet a peer so it can connect back to us
//!      sequence        number 2
//!      ipaddress       string
//!      mailbox         number 2
//!      groups          strings
//!      status          number 1
//!      headers         dictionary
//!  WHISPER - Send a message to a peer
//!      sequence        number 2
//!      content         frame
//!  SHOUT - Send a message to a group
//!      sequence        number 2
//!      group           string
//!      content         frame
//!  JOIN - Join a group
//!      sequence        number 2
//!      group           string
//!      status          number 1
//!  LEAVE - Leave a group
//!      sequence        number 2
//!      group           string
//!      status          number 1
//!  PING - Ping a peer that has gone silent
//!      sequence        number 2
//!  PING_OK - Reply to a peer's ping
//!      sequence        number 2
//! ```

use bytes::Bytes;

use crate::error::{Result, ZwireError};
use crate::headers::Headers;
use crate::message::{WireMessage, SIGNATURE_BASE};
use crate::socket::MessageSocket;
use crate::wire::{dict_size, string_list_size, string_size, WireReader, WireWriter};

/// HELLO wire tag.
pub const HELLO: u8 = 1;
/// WHISPER wire tag.
pub const WHISPER: u8 = 2;
/// SHOUT wire tag.
pub const SHOUT: u8 = 3;
/// JOIN wire tag.
pub const JOIN: u8 = 4;
/// LEAVE wire tag.
pub const LEAVE: u8 = 5;
/// PING wire tag.
pub const PING: u8 = 6;
/// PING_OK wire tag.
pub const PING_OK: u8 = 7;

/// A [`MessageSocket`] speaking the ZRE protocol.
pub type ZreSocket<T> = MessageSocket<ZreMsg, T>;

/// One ZRE protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum ZreMsg {
    /// Greet a peer so it can connect back to us.
    Hello {
        sequence: u16,
        ipaddress: String,
        mailbox: u16,
        groups: Vec<String>,
        status: u8,
        headers: Headers,
    },
    /// Send a message to a peer.
    Whisper { sequence: u16, content: Bytes },
    /// Send a message to a group.
    Shout {
        sequence: u16,
        group: String,
        content: Bytes,
    },
    /// Join a group.
    Join {
        sequence: u16,
        group: String,
        status: u8,
    },
    /// Leave a group.
    Leave {
        sequence: u16,
        group: String,
        status: u8,
    },
    /// Ping a peer that has gone silent.
    Ping { sequence: u16 },
    /// Reply to a peer's ping.
    PingOk { sequence: u16 },
}

impl ZreMsg {
    /// The sequence number; every variant carries one.
    pub fn sequence(&self) -> u16 {
        match self {
            ZreMsg::Hello { sequence, .. }
            | ZreMsg::Whisper { sequence, .. }
            | ZreMsg::Shout { sequence, .. }
            | ZreMsg::Join { sequence, .. }
            | ZreMsg::Leave { sequence, .. }
            | ZreMsg::Ping { sequence }
            | ZreMsg::PingOk { sequence } => *sequence,
        }
    }
}

impl WireMessage for ZreMsg {
    const SIGNATURE: u16 = SIGNATURE_BASE | 1;
    const PROTOCOL: &'static str = "zre";

    fn tag(&self) -> u8 {
        match self {
            ZreMsg::Hello { .. } => HELLO,
            ZreMsg::Whisper { .. } => WHISPER,
            ZreMsg::Shout { .. } => SHOUT,
            ZreMsg::Join { .. } => JOIN,
            ZreMsg::Leave { .. } => LEAVE,
            ZreMsg::Ping { .. } => PING,
            ZreMsg::PingOk { .. } => PING_OK,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ZreMsg::Hello { .. } => "HELLO",
            ZreMsg::Whisper { .. } => "WHISPER",
            ZreMsg::Shout { .. } => "SHOUT",
            ZreMsg::Join { .. } => "JOIN",
            ZreMsg::Leave { .. } => "LEAVE",
            ZreMsg::Ping { .. } => "PING",
            ZreMsg::PingOk { .. } => "PING_OK",
        }
    }

    fn body_size(&self) -> usize {
        match self {
            ZreMsg::Hello {
                ipaddress,
                groups,
                headers,
                ..
            } => 2 + string_size(ipaddress) + 2 + string_list_size(groups) + 1 + dict_size(headers),
            ZreMsg::Whisper { .. } => 2,
            ZreMsg::Shout { group, .. } => 2 + string_size(group),
            ZreMsg::Join { group, .. } | ZreMsg::Leave { group, .. } => 2 + string_size(group) + 1,
            ZreMsg::Ping { .. } | ZreMsg::PingOk { .. } => 2,
        }
    }

    fn encode_body(&self, writer: &mut WireWriter) -> Result<()> {
        match self {
            ZreMsg::Hello {
                sequence,
                ipaddress,
                mailbox,
                groups,
                status,
                headers,
            } => {
                writer.put_u16(*sequence);
                writer.put_string(ipaddress)?;
                writer.put_u16(*mailbox);
                writer.put_string_list(groups)?;
                writer.put_u8(*status);
                writer.put_dict(headers)?;
            }
            ZreMsg::Whisper { sequence, .. } => {
                writer.put_u16(*sequence);
            }
            ZreMsg::Shout {
                sequence, group, ..
            } => {
                writer.put_u16(*sequence);
                writer.put_string(group)?;
            }
            ZreMsg::Join {
                sequence,
                group,
                status,
            }
            | ZreMsg::Leave {
                sequence,
                group,
                status,
            } => {
                writer.put_u16(*sequence);
                writer.put_string(group)?;
                writer.put_u8(*status);
            }
            ZreMsg::Ping { sequence } | ZreMsg::PingOk { sequence } => {
                writer.put_u16(*sequence);
            }
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut WireReader<'_>) -> Result<Self> {
        let message = match tag {
            HELLO => ZreMsg::Hello {
                sequence: reader.get_u16()?,
                ipaddress: reader.get_string()?,
                mailbox: reader.get_u16()?,
                groups: reader.get_string_list()?,
                status: reader.get_u8()?,
                headers: reader.get_dict()?,
            },
            WHISPER => ZreMsg::Whisper {
                sequence: reader.get_u16()?,
                content: Bytes::new(),
            },
            SHOUT => ZreMsg::Shout {
                sequence: reader.get_u16()?,
                group: reader.get_string()?,
                content: Bytes::new(),
            },
            JOIN => ZreMsg::Join {
                sequence: reader.get_u16()?,
                group: reader.get_string()?,
                status: reader.get_u8()?,
            },
            LEAVE => ZreMsg::Leave {
                sequence: reader.get_u16()?,
                group: reader.get_string()?,
                status: reader.get_u8()?,
            },
            PING => ZreMsg::Ping {
                sequence: reader.get_u16()?,
            },
            PING_OK => ZreMsg::PingOk {
                sequence: reader.get_u16()?,
            },
            _ => {
                return Err(ZwireError::Malformed(format!(
                    "unknown zre message tag {}",
                    tag
                )))
            }
        };
        Ok(message)
    }

    fn has_content(&self) -> bool {
        matches!(self, ZreMsg::Whisper { .. } | ZreMsg::Shout { .. })
    }

    fn content(&self) -> Option<&Bytes> {
        match self {
            ZreMsg::Whisper { content, .. } | ZreMsg::Shout { content, .. } => Some(content),
            _ => None,
        }
    }

    fn set_content(&mut self, new_content: Bytes) {
        if let ZreMsg::Whisper { content, .. } | ZreMsg::Shout { content, .. } = self {
            *content = new_content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_roundtrip() {
        let hello = ZreMsg::Hello {
            sequence: 123,
            ipaddress: "Life is short but Now lasts for ever".into(),
            mailbox: 123,
            groups: vec!["Name: Brutus".into(), "Age: 43".into()],
            status: 123,
            headers: [("Name", "Brutus"), ("Age", "43")].into_iter().collect(),
        };

        let frame = hello.encode_envelope().unwrap();
        let decoded = ZreMsg::decode_envelope(&frame).unwrap();
        assert_eq!(decoded, hello);

        match decoded {
            ZreMsg::Hello { groups, headers, .. } => {
                // Group order is significant.
                assert_eq!(groups[0], "Name: Brutus");
                assert_eq!(groups[1], "Age: 43");
                assert_eq!(headers.get_number("Age", 0), 43);
            }
            other => panic!("decoded {:?}", other),
        }
    }

    #[test]
    fn test_ping_ok_envelope_layout() {
        let frame = ZreMsg::PingOk { sequence: 0x0102 }.encode_envelope().unwrap();
        assert_eq!(&frame[..], &[0xAA, 0xA1, PING_OK, 0x01, 0x02]);
    }

    #[test]
    fn test_whisper_decodes_with_empty_content() {
        let whisper = ZreMsg::Whisper {
            sequence: 7,
            content: Bytes::from_static(b"hello"),
        };
        // Content travels in its own frame; the envelope alone decodes
        // back with empty content.
        let frame = whisper.encode_envelope().unwrap();
        assert_eq!(frame.len(), 5);

        let decoded = ZreMsg::decode_envelope(&frame).unwrap();
        assert_eq!(
            decoded,
            ZreMsg::Whisper {
                sequence: 7,
                content: Bytes::new(),
            }
        );
        assert!(decoded.has_content());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        for tag in [0u8, 255] {
            let mut writer = WireWriter::with_capacity(5);
            writer.put_u16(ZreMsg::SIGNATURE);
            writer.put_u8(tag);
            writer.put_u16(0);
            let frame = writer.finish();
            assert!(matches!(
                ZreMsg::decode_envelope(&frame),
                Err(ZwireError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_deep_clone() {
        let original = ZreMsg::Shout {
            sequence: 1,
            group: "g".into(),
            content: Bytes::from_static(b"payload"),
        };
        let copy = original.clone();
        assert_eq!(copy, original);
    }
}
