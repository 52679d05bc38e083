//! Transport abstraction consumed by the socket layer.
//!
//! A transport moves opaque frames between two endpoints. A logical
//! message is a run of frames linked by the MORE flag; the last frame
//! of a message carries MORE = false. The codec layer never looks
//! inside the transport, it only needs:
//!
//! - [`Transport::send_frame`] / [`Transport::recv_frame`] with the
//!   MORE flag,
//! - [`Transport::has_more`] for the frame last received,
//! - [`Transport::kind`] to decide whether logical messages carry a
//!   leading routing-address frame.
//!
//! Two implementations are provided: an in-memory connected [`pair`]
//! and a blocking [`StreamTransport`] over any `Read + Write` stream.

use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;

use crate::error::Result;

mod pair;
mod stream;

pub use pair::{pair, PairTransport};
pub use stream::{StreamTransport, DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE};

/// The routing role of a transport endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    /// Addressable endpoint: received logical messages lead with the
    /// peer's routing address, and sends must supply one.
    Router,
    /// Point-to-point endpoint with no address frames.
    Dealer,
}

/// A connected, blocking, frame-oriented endpoint.
pub trait Transport {
    /// The routing role of this endpoint.
    fn kind(&self) -> SocketKind;

    /// Send one frame; `more` marks it as part of a larger logical
    /// message. Blocks until the transport accepts the frame.
    fn send_frame(&mut self, frame: &[u8], more: bool) -> Result<()>;

    /// Receive the next frame, blocking until one is available.
    fn recv_frame(&mut self) -> Result<Bytes>;

    /// Whether the last received frame announced more frames in the
    /// same logical message.
    fn has_more(&self) -> bool;

    /// Release the endpoint.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

static NEXT_IDENTITY: AtomicU32 = AtomicU32::new(1);

/// Generate a fresh 5-byte routing identity (a zero byte then a
/// process-wide counter, the convention of the messaging library the
/// protocols were built on).
pub fn generate_identity() -> Bytes {
    let n = NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed);
    let mut identity = Vec::with_capacity(5);
    identity.push(0);
    identity.extend_from_slice(&n.to_be_bytes());
    Bytes::from(identity)
}

/// Routing-address bookkeeping shared by the concrete transports.
///
/// Emulates addressable delivery over a point-to-point link: a
/// [`SocketKind::Router`] endpoint surfaces the peer's identity as the
/// leading frame of every received logical message, and consumes the
/// leading address frame of every sent one (the link has exactly one
/// peer to route to).
#[derive(Debug)]
pub(crate) struct RouterState {
    peer_identity: Bytes,
    pending: Option<(Bytes, bool)>,
    last_more: bool,
    recv_at_start: bool,
    send_at_start: bool,
}

impl RouterState {
    pub(crate) fn new(peer_identity: Bytes) -> Self {
        Self {
            peer_identity,
            pending: None,
            last_more: false,
            recv_at_start: true,
            send_at_start: true,
        }
    }

    /// Produce the next inbound frame, pulling from `pull` as needed.
    ///
    /// On a router endpoint at a message boundary, the next real frame
    /// is held back and the peer identity is delivered first.
    pub(crate) fn recv(
        &mut self,
        kind: SocketKind,
        pull: impl FnOnce() -> Result<(Bytes, bool)>,
    ) -> Result<Bytes> {
        if let Some((frame, more)) = self.pending.take() {
            return Ok(self.deliver(frame, more));
        }
        let (frame, more) = pull()?;
        if kind == SocketKind::Router && self.recv_at_start {
            self.pending = Some((frame, more));
            self.recv_at_start = false;
            self.last_more = true;
            return Ok(self.peer_identity.clone());
        }
        Ok(self.deliver(frame, more))
    }

    fn deliver(&mut self, frame: Bytes, more: bool) -> Bytes {
        self.last_more = more;
        self.recv_at_start = !more;
        frame
    }

    /// Track an outbound frame. Returns whether the frame should be
    /// transmitted; the leading address frame of a router send is
    /// consumed instead.
    pub(crate) fn note_send(&mut self, kind: SocketKind, more: bool) -> bool {
        let consumed = kind == SocketKind::Router && self.send_at_start;
        self.send_at_start = !more;
        !consumed
    }

    pub(crate) fn has_more(&self) -> bool {
        self.last_more
    }
}
