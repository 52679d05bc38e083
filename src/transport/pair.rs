//! In-memory connected transport pair.
//!
//! The blocking equivalent of an `inproc://` socket pair, used by the
//! tests and demos. Frames cross a channel; nothing is serialized.

use std::sync::mpsc;

use bytes::Bytes;

use super::{generate_identity, RouterState, SocketKind, Transport};
use crate::error::{Result, ZwireError};

/// One end of an in-memory transport pair.
pub struct PairTransport {
    kind: SocketKind,
    tx: Option<mpsc::Sender<(Bytes, bool)>>,
    rx: mpsc::Receiver<(Bytes, bool)>,
    router: RouterState,
}

/// Create a connected transport pair with the given endpoint roles.
///
/// # Example
///
/// ```
/// use zwire::transport::{pair, SocketKind, Transport};
///
/// let (mut a, mut b) = pair(SocketKind::Dealer, SocketKind::Dealer);
/// a.send_frame(b"hello", false).unwrap();
/// assert_eq!(&b.recv_frame().unwrap()[..], b"hello");
/// ```
pub fn pair(left: SocketKind, right: SocketKind) -> (PairTransport, PairTransport) {
    let (to_right, from_left) = mpsc::channel();
    let (to_left, from_right) = mpsc::channel();
    let left_identity = generate_identity();
    let right_identity = generate_identity();

    let left = PairTransport {
        kind: left,
        tx: Some(to_right),
        rx: from_right,
        router: RouterState::new(right_identity),
    };
    let right = PairTransport {
        kind: right,
        tx: Some(to_left),
        rx: from_left,
        router: RouterState::new(left_identity),
    };
    (left, right)
}

impl Transport for PairTransport {
    fn kind(&self) -> SocketKind {
        self.kind
    }

    fn send_frame(&mut self, frame: &[u8], more: bool) -> Result<()> {
        if !self.router.note_send(self.kind, more) {
            return Ok(());
        }
        let tx = self.tx.as_ref().ok_or(ZwireError::ConnectionClosed)?;
        tx.send((Bytes::copy_from_slice(frame), more))
            .map_err(|_| ZwireError::ConnectionClosed)
    }

    fn recv_frame(&mut self) -> Result<Bytes> {
        let rx = &self.rx;
        self.router
            .recv(self.kind, || rx.recv().map_err(|_| ZwireError::ConnectionClosed))
    }

    fn has_more(&self) -> bool {
        self.router.has_more()
    }

    fn close(&mut self) -> Result<()> {
        self.tx = None;
        Ok(())
    }
}
