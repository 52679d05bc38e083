//! Blocking framed transport over a byte stream.
//!
//! Carries logical messages over any `Read + Write` stream (Unix
//! socket, TCP) with a fixed 5-byte frame header:
//!
//! ```text
//! ┌───────┬──────────┬──────────────┐
//! │ Flags │ Length   │ Payload      │
//! │ 1 byte│ 4 bytes  │ Length bytes │
//! │       │ u32 BE   │              │
//! └───────┴──────────┴──────────────┘
//! ```
//!
//! Flag bit 0 is MORE; the remaining bits are reserved and must be
//! zero. Frames larger than the configured maximum are rejected before
//! the payload is read.

use std::io::{self, Read, Write};

use bytes::Bytes;

use super::{generate_identity, RouterState, SocketKind, Transport};
use crate::error::{Result, ZwireError};

/// Frame header size in bytes (flags + length).
pub const FRAME_HEADER_SIZE: usize = 5;

/// Default maximum frame payload size (16 MB).
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

const FLAG_MORE: u8 = 0x01;
const RESERVED_MASK: u8 = !FLAG_MORE;

/// A blocking, frame-oriented endpoint over a byte stream.
pub struct StreamTransport<S> {
    stream: S,
    kind: SocketKind,
    max_frame_size: u32,
    router: RouterState,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap a connected stream, generating a fresh peer identity.
    pub fn new(stream: S, kind: SocketKind) -> Self {
        Self::with_identity(stream, kind, generate_identity())
    }

    /// Wrap a connected stream with an explicit peer identity.
    pub fn with_identity(stream: S, kind: SocketKind, peer_identity: Bytes) -> Self {
        Self {
            stream,
            kind,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            router: RouterState::new(peer_identity),
        }
    }

    /// Override the maximum accepted frame payload size.
    pub fn with_max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the transport, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn pull_frame(stream: &mut S, max_frame_size: u32) -> Result<(Bytes, bool)> {
        let mut head = [0u8; FRAME_HEADER_SIZE];
        read_exact_or_closed(stream, &mut head)?;

        let flags = head[0];
        if flags & RESERVED_MASK != 0 {
            return Err(ZwireError::Malformed(format!(
                "reserved frame flag bits set: 0x{:02X}",
                flags
            )));
        }
        let more = flags & FLAG_MORE != 0;

        let len = u32::from_be_bytes([head[1], head[2], head[3], head[4]]);
        if len > max_frame_size {
            return Err(ZwireError::Malformed(format!(
                "frame of {} bytes exceeds maximum {}",
                len, max_frame_size
            )));
        }

        let mut payload = vec![0u8; len as usize];
        read_exact_or_closed(stream, &mut payload)?;
        Ok((Bytes::from(payload), more))
    }
}

/// `read_exact` that maps a clean EOF to [`ZwireError::ConnectionClosed`].
fn read_exact_or_closed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ZwireError::ConnectionClosed
        } else {
            ZwireError::Io(e)
        }
    })
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn kind(&self) -> SocketKind {
        self.kind
    }

    fn send_frame(&mut self, frame: &[u8], more: bool) -> Result<()> {
        if !self.router.note_send(self.kind, more) {
            return Ok(());
        }
        if frame.len() > self.max_frame_size as usize {
            return Err(ZwireError::FieldTooLong(format!(
                "frame of {} bytes exceeds maximum {}",
                frame.len(),
                self.max_frame_size
            )));
        }

        let mut head = [0u8; FRAME_HEADER_SIZE];
        head[0] = if more { FLAG_MORE } else { 0 };
        head[1..].copy_from_slice(&(frame.len() as u32).to_be_bytes());

        self.stream.write_all(&head)?;
        self.stream.write_all(frame)?;
        if !more {
            self.stream.flush()?;
        }
        Ok(())
    }

    fn recv_frame(&mut self) -> Result<Bytes> {
        let stream = &mut self.stream;
        let max_frame_size = self.max_frame_size;
        self.router
            .recv(self.kind, || Self::pull_frame(stream, max_frame_size))
    }

    fn has_more(&self) -> bool {
        self.router.has_more()
    }

    fn close(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }
}
