//! Grid clustering protocol.
//!
//! The message grammar:
//!
//! ```text
//!  CONNECT - Greet a peer so it can connect back to us
//!      sequence        number 2
//!      ip              string
//!      port            number 2
//!      clusters        strings
//!      status          number 1
//!      headers         dictionary
//!  WHISPER - Send a message to a peer
//!      sequence        number 2
//!      content         frame
//!  BROADCAST - Send a message to a cluster
//!      sequence        number 2
//!      cluster         string
//!      content         frame
//!  JOIN - Join a cluster
//!      sequence        number 2
//!      cluster         string
//!      status          number 1
//!  EXIT - Leave a cluster
//!      sequence        number 2
//!      cluster         string
//!      status          number 1
//!  PING - Ping a peer that has gone silent
//!      sequence        number 2
//!  ECHO - Reply to a peer's ping
//!      sequence        number 2
//! ```

use bytes::Bytes;

use crate::error::{Result, ZwireError};
use crate::headers::Headers;
use crate::message::{WireMessage, SIGNATURE_BASE};
use crate::socket::MessageSocket;
use crate::wire::{dict_size, string_list_size, string_size, WireReader, WireWriter};

/// CONNECT wire tag.
pub const CONNECT: u8 = 1;
/// WHISPER wire tag.
pub const WHISPER: u8 = 2;
/// BROADCAST wire tag.
pub const BROADCAST: u8 = 3;
/// JOIN wire tag.
pub const JOIN: u8 = 4;
/// EXIT wire tag.
pub const EXIT: u8 = 5;
/// PING wire tag.
pub const PING: u8 = 6;
/// ECHO wire tag.
pub const ECHO: u8 = 7;

/// A [`MessageSocket`] speaking the Grid protocol.
pub type GridSocket<T> = MessageSocket<GridMsg, T>;

/// One Grid protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum GridMsg {
    /// Greet a peer so it can connect back to us.
    Connect {
        sequence: u16,
        ip: String,
        port: u16,
        clusters: Vec<String>,
        status: u8,
        headers: Headers,
    },
    /// Send a message to a peer.
    Whisper { sequence: u16, content: Bytes },
    /// Send a message to a cluster.
    Broadcast {
        sequence: u16,
        cluster: String,
        content: Bytes,
    },
    /// Join a cluster.
    Join {
        sequence: u16,
        cluster: String,
        status: u8,
    },
    /// Leave a cluster.
    Exit {
        sequence: u16,
        cluster: String,
        status: u8,
    },
    /// Ping a peer that has gone silent.
    Ping { sequence: u16 },
    /// Reply to a peer's ping.
    Echo { sequence: u16 },
}

impl GridMsg {
    /// The sequence number; every variant carries one.
    pub fn sequence(&self) -> u16 {
        match self {
            GridMsg::Connect { sequence, .. }
            | GridMsg::Whisper { sequence, .. }
            | GridMsg::Broadcast { sequence, .. }
            | GridMsg::Join { sequence, .. }
            | GridMsg::Exit { sequence, .. }
            | GridMsg::Ping { sequence }
            | GridMsg::Echo { sequence } => *sequence,
        }
    }
}

impl WireMessage for GridMsg {
    const SIGNATURE: u16 = SIGNATURE_BASE | 1;
    const PROTOCOL: &'static str = "grid";

    fn tag(&self) -> u8 {
        match self {
            GridMsg::Connect { .. } => CONNECT,
            GridMsg::Whisper { .. } => WHISPER,
            GridMsg::Broadcast { .. } => BROADCAST,
            GridMsg::Join { .. } => JOIN,
            GridMsg::Exit { .. } => EXIT,
            GridMsg::Ping { .. } => PING,
            GridMsg::Echo { .. } => ECHO,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GridMsg::Connect { .. } => "CONNECT",
            GridMsg::Whisper { .. } => "WHISPER",
            GridMsg::Broadcast { .. } => "BROADCAST",
            GridMsg::Join { .. } => "JOIN",
            GridMsg::Exit { .. } => "EXIT",
            GridMsg::Ping { .. } => "PING",
            GridMsg::Echo { .. } => "ECHO",
        }
    }

    fn body_size(&self) -> usize {
        match self {
            GridMsg::Connect {
                ip,
                clusters,
                headers,
                ..
            } => 2 + string_size(ip) + 2 + string_list_size(clusters) + 1 + dict_size(headers),
            GridMsg::Whisper { .. } => 2,
            GridMsg::Broadcast { cluster, .. } => 2 + string_size(cluster),
            GridMsg::Join { cluster, .. } | GridMsg::Exit { cluster, .. } => {
                2 + string_size(cluster) + 1
            }
            GridMsg::Ping { .. } | GridMsg::Echo { .. } => 2,
        }
    }

    fn encode_body(&self, writer: &mut WireWriter) -> Result<()> {
        match self {
            GridMsg::Connect {
                sequence,
                ip,
                port,
                clusters,
                status,
                headers,
            } => {
                writer.put_u16(*sequence);
                writer.put_string(ip)?;
                writer.put_u16(*port);
                writer.put_string_list(clusters)?;
                writer.put_u8(*status);
                writer.put_dict(headers)?;
            }
            GridMsg::Whisper { sequence, .. } => {
                writer.put_u16(*sequence);
            }
            GridMsg::Broadcast {
                sequence, cluster, ..
            } => {
                writer.put_u16(*sequence);
                writer.put_string(cluster)?;
            }
            GridMsg::Join {
                sequence,
                cluster,
                status,
            }
            | GridMsg::Exit {
                sequence,
                cluster,
                status,
            } => {
                writer.put_u16(*sequence);
                writer.put_string(cluster)?;
                writer.put_u8(*status);
            }
            GridMsg::Ping { sequence } | GridMsg::Echo { sequence } => {
                writer.put_u16(*sequence);
            }
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut WireReader<'_>) -> Result<Self> {
        let message = match tag {
            CONNECT => GridMsg::Connect {
                sequence: reader.get_u16()?,
                ip: reader.get_string()?,
                port: reader.get_u16()?,
                clusters: reader.get_string_list()?,
                status: reader.get_u8()?,
                headers: reader.get_dict()?,
            },
            WHISPER => GridMsg::Whisper {
                sequence: reader.get_u16()?,
                content: Bytes::new(),
            },
            BROADCAST => GridMsg::Broadcast {
                sequence: reader.get_u16()?,
                cluster: reader.get_string()?,
                content: Bytes::new(),
            },
            JOIN => GridMsg::Join {
                sequence: reader.get_u16()?,
                cluster: reader.get_string()?,
                status: reader.get_u8()?,
            },
            EXIT => GridMsg::Exit {
                sequence: reader.get_u16()?,
                cluster: reader.get_string()?,
                status: reader.get_u8()?,
            },
            PING => GridMsg::Ping {
                sequence: reader.get_u16()?,
            },
            ECHO => GridMsg::Echo {
                sequence: reader.get_u16()?,
            },
            _ => {
                return Err(ZwireError::Malformed(format!(
                    "unknown grid message tag {}",
                    tag
                )))
            }
        };
        Ok(message)
    }

    fn has_content(&self) -> bool {
        matches!(self, GridMsg::Whisper { .. } | GridMsg::Broadcast { .. })
    }

    fn content(&self) -> Option<&Bytes> {
        match self {
            GridMsg::Whisper { content, .. } | GridMsg::Broadcast { content, .. } => Some(content),
            _ => None,
        }
    }

    fn set_content(&mut self, new_content: Bytes) {
        if let GridMsg::Whisper { content, .. } | GridMsg::Broadcast { content, .. } = self {
            *content = new_content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_envelope_layout() {
        let ping = GridMsg::Ping { sequence: 0x007B };
        let frame = ping.encode_envelope().unwrap();
        assert_eq!(&frame[..], &[0xAA, 0xA1, PING, 0x00, 0x7B]);
    }

    #[test]
    fn test_connect_roundtrip() {
        let connect = GridMsg::Connect {
            sequence: 123,
            ip: "10.0.0.1".into(),
            port: 5555,
            clusters: vec!["a".into(), "b".into()],
            status: 1,
            headers: [("x", "1")].into_iter().collect(),
        };

        let frame = connect.encode_envelope().unwrap();
        let decoded = GridMsg::decode_envelope(&frame).unwrap();
        assert_eq!(decoded, connect);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        for tag in [0u8, 8, 255] {
            let mut writer = WireWriter::with_capacity(5);
            writer.put_u16(GridMsg::SIGNATURE);
            writer.put_u8(tag);
            writer.put_u16(0);
            let frame = writer.finish();
            assert!(matches!(
                GridMsg::decode_envelope(&frame),
                Err(ZwireError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let mut writer = WireWriter::with_capacity(5);
        writer.put_u16(0xAAA2);
        writer.put_u8(PING);
        writer.put_u16(0);
        let frame = writer.finish();
        assert!(matches!(
            GridMsg::decode_envelope(&frame),
            Err(ZwireError::BadSignature(0xAAA2))
        ));
    }

    #[test]
    fn test_sequence_accessor() {
        assert_eq!(GridMsg::Echo { sequence: 42 }.sequence(), 42);
        assert_eq!(
            GridMsg::Broadcast {
                sequence: 7,
                cluster: "c".into(),
                content: Bytes::new(),
            }
            .sequence(),
            7
        );
    }
}
