//! Distributed log-shipping protocol.
//!
//! The message grammar:
//!
//! ```text
//!  LOG - One log line with its originating host, file and position
//!      sequence        number 4
//!      headers         dictionary
//!      ip              string
//!      port            number 2
//!      file_name       string
//!      line_num        number 4
//!      message         string
//!  LOGS - A batch of log lines from one origin
//!      sequence        number 4
//!      headers         dictionary
//!      ip              string
//!      port            number 2
//!      file_name       string
//!      line_num        number 4
//!      message         string
//!      messages        strings
//!  REQUEST - Request a replay of lines between start and end
//!      sequence        number 4
//!      file_name       string
//!      start           number 4
//!      end             number 4
//!  REPLY - The requested sequence of replayed log lines
//!      sequence        number 4
//!      headers         dictionary
//!      messages        strings
//! ```

use crate::error::{Result, ZwireError};
use crate::headers::Headers;
use crate::message::{WireMessage, SIGNATURE_BASE};
use crate::socket::MessageSocket;
use crate::wire::{dict_size, string_list_size, string_size, WireReader, WireWriter};

/// LOG wire tag.
pub const LOG: u8 = 1;
/// LOGS wire tag.
pub const LOGS: u8 = 2;
/// REQUEST wire tag.
pub const REQUEST: u8 = 3;
/// REPLY wire tag.
pub const REPLY: u8 = 4;

/// A [`MessageSocket`] speaking the log-shipping protocol.
pub type DistLogSocket<T> = MessageSocket<DistLogMsg, T>;

/// One log-shipping protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistLogMsg {
    /// One log line with its originating host, file and position.
    Log {
        sequence: u32,
        headers: Headers,
        ip: String,
        port: u16,
        file_name: String,
        line_num: u32,
        message: String,
    },
    /// A batch of log lines from one origin.
    Logs {
        sequence: u32,
        headers: Headers,
        ip: String,
        port: u16,
        file_name: String,
        line_num: u32,
        message: String,
        messages: Vec<String>,
    },
    /// Request a replay of lines between start and end.
    Request {
        sequence: u32,
        file_name: String,
        start: u32,
        end: u32,
    },
    /// The requested sequence of replayed log lines.
    Reply {
        sequence: u32,
        headers: Headers,
        messages: Vec<String>,
    },
}

impl DistLogMsg {
    /// The sequence number; every variant carries one.
    pub fn sequence(&self) -> u32 {
        match self {
            DistLogMsg::Log { sequence, .. }
            | DistLogMsg::Logs { sequence, .. }
            | DistLogMsg::Request { sequence, .. }
            | DistLogMsg::Reply { sequence, .. } => *sequence,
        }
    }
}

impl WireMessage for DistLogMsg {
    const SIGNATURE: u16 = SIGNATURE_BASE | 1;
    const PROTOCOL: &'static str = "distlog";

    fn tag(&self) -> u8 {
        match self {
            DistLogMsg::Log { .. } => LOG,
            DistLogMsg::Logs { .. } => LOGS,
            DistLogMsg::Request { .. } => REQUEST,
            DistLogMsg::Reply { .. } => REPLY,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DistLogMsg::Log { .. } => "LOG",
            DistLogMsg::Logs { .. } => "LOGS",
            DistLogMsg::Request { .. } => "REQUEST",
            DistLogMsg::Reply { .. } => "REPLY",
        }
    }

    fn body_size(&self) -> usize {
        match self {
            DistLogMsg::Log {
                headers,
                ip,
                file_name,
                message,
                ..
            } => {
                4 + dict_size(headers)
                    + string_size(ip)
                    + 2
                    + string_size(file_name)
                    + 4
                    + string_size(message)
            }
            DistLogMsg::Logs {
                headers,
                ip,
                file_name,
                message,
                messages,
                ..
            } => {
                4 + dict_size(headers)
                    + string_size(ip)
                    + 2
                    + string_size(file_name)
                    + 4
                    + string_size(message)
                    + string_list_size(messages)
            }
            DistLogMsg::Request { file_name, .. } => 4 + string_size(file_name) + 4 + 4,
            DistLogMsg::Reply {
                headers, messages, ..
            } => 4 + dict_size(headers) + string_list_size(messages),
        }
    }

    fn encode_body(&self, writer: &mut WireWriter) -> Result<()> {
        match self {
            DistLogMsg::Log {
                sequence,
                headers,
                ip,
                port,
                file_name,
                line_num,
                message,
            } => {
                writer.put_u32(*sequence);
                writer.put_dict(headers)?;
                writer.put_string(ip)?;
                writer.put_u16(*port);
                writer.put_string(file_name)?;
                writer.put_u32(*line_num);
                writer.put_string(message)?;
            }
            DistLogMsg::Logs {
                sequence,
                headers,
                ip,
                port,
                file_name,
                line_num,
                message,
                messages,
            } => {
                writer.put_u32(*sequence);
                writer.put_dict(headers)?;
                writer.put_string(ip)?;
                writer.put_u16(*port);
                writer.put_string(file_name)?;
                writer.put_u32(*line_num);
                writer.put_string(message)?;
                writer.put_string_list(messages)?;
            }
            DistLogMsg::Request {
                sequence,
                file_name,
                start,
                end,
            } => {
                writer.put_u32(*sequence);
                writer.put_string(file_name)?;
                writer.put_u32(*start);
                writer.put_u32(*end);
            }
            DistLogMsg::Reply {
                sequence,
                headers,
                messages,
            } => {
                writer.put_u32(*sequence);
                writer.put_dict(headers)?;
                writer.put_string_list(messages)?;
            }
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut WireReader<'_>) -> Result<Self> {
        let message = match tag {
            LOG => DistLogMsg::Log {
                sequence: reader.get_u32()?,
                headers: reader.get_dict()?,
                ip: reader.get_string()?,
                port: reader.get_u16()?,
                file_name: reader.get_string()?,
                line_num: reader.get_u32()?,
                message: reader.get_string()?,
            },
            LOGS => DistLogMsg::Logs {
                sequence: reader.get_u32()?,
                headers: reader.get_dict()?,
                ip: reader.get_string()?,
                port: reader.get_u16()?,
                file_name: reader.get_string()?,
                line_num: reader.get_u32()?,
                message: reader.get_string()?,
                messages: reader.get_string_list()?,
            },
            REQUEST => DistLogMsg::Request {
                sequence: reader.get_u32()?,
                file_name: reader.get_string()?,
                start: reader.get_u32()?,
                end: reader.get_u32()?,
            },
            REPLY => DistLogMsg::Reply {
                sequence: reader.get_u32()?,
                headers: reader.get_dict()?,
                messages: reader.get_string_list()?,
            },
            _ => {
                return Err(ZwireError::Malformed(format!(
                    "unknown distlog message tag {}",
                    tag
                )))
            }
        };
        Ok(message)
    }
}
