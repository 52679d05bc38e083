//! Typed message socket: the codec/transport adapter.
//!
//! A [`MessageSocket`] binds one protocol family to one transport
//! endpoint. Receiving scans for a correctly-signed envelope (dropping
//! garbage logical messages from misrouted peers), dispatches on the
//! type tag, and attaches the trailing content frame where the variant
//! carries one. Sending serializes the envelope at its exact size and
//! writes the address / envelope / content frames in order.
//!
//! The socket is synchronous and blocking, and holds no state between
//! calls beyond the transport handle and the last-seen peer address.
//!
//! # Example
//!
//! ```
//! use zwire::proto::zre::ZreMsg;
//! use zwire::transport::{pair, SocketKind};
//! use zwire::MessageSocket;
//!
//! let (out, inp) = pair(SocketKind::Dealer, SocketKind::Router);
//! let mut output = MessageSocket::new(out);
//! let mut input = MessageSocket::new(inp);
//!
//! output.send(ZreMsg::Ping { sequence: 123 }).unwrap();
//! let msg = input.recv().unwrap().expect("a valid message");
//! assert_eq!(msg, ZreMsg::Ping { sequence: 123 });
//! ```

use std::marker::PhantomData;

use bytes::Bytes;

use crate::error::{Result, ZwireError};
use crate::message::{peek_signature, WireMessage};
use crate::transport::{SocketKind, Transport};

/// Default cap on garbage logical messages dropped per receive call.
pub const DEFAULT_GARBAGE_LIMIT: usize = 64;

/// A transport endpoint speaking one protocol family.
pub struct MessageSocket<M, T> {
    transport: T,
    address: Option<Bytes>,
    garbage_limit: usize,
    _message: PhantomData<fn() -> M>,
}

impl<M: WireMessage, T: Transport> MessageSocket<M, T> {
    /// Bind a protocol family to a connected transport endpoint.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            address: None,
            garbage_limit: DEFAULT_GARBAGE_LIMIT,
            _message: PhantomData,
        }
    }

    /// Cap the number of garbage logical messages one receive call will
    /// drop before giving up. Bounds worst-case latency against a peer
    /// spraying frames with foreign signatures.
    pub fn with_garbage_limit(mut self, garbage_limit: usize) -> Self {
        self.garbage_limit = garbage_limit;
        self
    }

    /// The routing address of the peer whose message was last received.
    pub fn address(&self) -> Option<&Bytes> {
        self.address.as_ref()
    }

    /// Set the destination address for subsequent router-side sends.
    pub fn set_address(&mut self, address: Bytes) {
        self.address = Some(address);
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Receive and decode one message, blocking until a logical message
    /// arrives.
    ///
    /// Returns `Ok(None)` for a malformed logical message (unknown tag,
    /// field underrun, missing content frame, address frame with
    /// nothing following, or the garbage cap being reached); the socket
    /// stays usable for the next call. Transport failures are returned
    /// as errors and are not retried.
    pub fn recv(&mut self) -> Result<Option<M>> {
        let mut dropped = 0usize;

        // Scan for a correctly-signed envelope; garbage logical
        // messages from badly-connected peers are drained and skipped.
        let envelope = loop {
            if self.transport.kind() == SocketKind::Router {
                let address = self.transport.recv_frame()?;
                if !self.transport.has_more() {
                    let err = ZwireError::ProtocolViolation(
                        "address frame with no envelope following".into(),
                    );
                    tracing::warn!(protocol = M::PROTOCOL, %err, "dropping logical message");
                    return Ok(None);
                }
                self.address = Some(address);
            }

            let frame = self.transport.recv_frame()?;
            match peek_signature(&frame) {
                Some(signature) if signature == M::SIGNATURE => break frame,
                signature => {
                    tracing::debug!(
                        protocol = M::PROTOCOL,
                        ?signature,
                        "dropping logical message with bad signature"
                    );
                    self.drain_logical()?;
                    dropped += 1;
                    if dropped >= self.garbage_limit {
                        tracing::warn!(
                            protocol = M::PROTOCOL,
                            dropped,
                            "garbage limit reached, giving up on this receive"
                        );
                        return Ok(None);
                    }
                }
            }
        };

        let mut message = match M::decode_envelope(&envelope) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(protocol = M::PROTOCOL, %err, "malformed message");
                self.drain_logical()?;
                return Ok(None);
            }
        };

        if message.has_content() {
            if !self.transport.has_more() {
                tracing::warn!(
                    protocol = M::PROTOCOL,
                    kind = message.name(),
                    "missing content frame"
                );
                return Ok(None);
            }
            message.set_content(self.transport.recv_frame()?);
        }

        // Frames past the last field belong to no variant; drain them
        // so the next call starts at a message boundary.
        if self.transport.has_more() {
            self.drain_logical()?;
        }

        Ok(Some(message))
    }

    /// Encode and send one message. The message is consumed: a sent
    /// message cannot be sent again.
    ///
    /// On a router endpoint the stored peer address is sent first; the
    /// envelope follows, then the content frame for content-bearing
    /// variants (an empty frame when content was never set).
    ///
    /// # Panics
    ///
    /// Panics when sending on a router endpoint with no destination
    /// address set. There is nowhere to route the message; this is a
    /// programming error, not a recoverable condition.
    pub fn send(&mut self, message: M) -> Result<()> {
        let envelope = message.encode_envelope()?;

        if self.transport.kind() == SocketKind::Router {
            let address = self
                .address
                .clone()
                .expect("router socket send with no destination address");
            self.transport.send_frame(&address, true)?;
        }

        let more = message.has_content();
        self.transport.send_frame(&envelope, more)?;
        if more {
            let content = message.content().cloned().unwrap_or_default();
            self.transport.send_frame(&content, false)?;
        }
        Ok(())
    }

    /// Close the socket, releasing the transport endpoint.
    pub fn close(mut self) -> Result<()> {
        self.transport.close()
    }

    fn drain_logical(&mut self) -> Result<()> {
        while self.transport.has_more() {
            self.transport.recv_frame()?;
        }
        Ok(())
    }
}
