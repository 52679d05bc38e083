//! Dealer/router demo: a peer greets a hub over a Unix socket pair and
//! whispers to it; the hub whispers back to the address it learned.
//!
//! Run with `cargo run --example whisper`.

use std::os::unix::net::UnixStream;
use std::thread;

use bytes::Bytes;
use zwire::proto::zre::{ZreMsg, ZreSocket};
use zwire::transport::{SocketKind, StreamTransport};
use zwire::WireMessage;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let (peer_stream, hub_stream) = UnixStream::pair().expect("socketpair");

    let hub = thread::spawn(move || {
        let mut socket = ZreSocket::new(StreamTransport::new(hub_stream, SocketKind::Router));

        while let Some(msg) = socket.recv().expect("hub receive") {
            println!("hub <- {}: {:?}", msg.name(), msg);
            if let ZreMsg::Whisper { sequence, .. } = msg {
                socket
                    .send(ZreMsg::Whisper {
                        sequence,
                        content: Bytes::from_static(b"heard you"),
                    })
                    .expect("hub send");
                break;
            }
        }
    });

    let mut socket = ZreSocket::new(StreamTransport::new(peer_stream, SocketKind::Dealer));

    socket
        .send(ZreMsg::Hello {
            sequence: 1,
            ipaddress: "10.0.0.1".into(),
            mailbox: 5670,
            groups: vec!["global".into()],
            status: 1,
            headers: [("name", "peer-1")].into_iter().collect(),
        })
        .expect("peer send");
    socket
        .send(ZreMsg::Whisper {
            sequence: 2,
            content: Bytes::from_static(b"psst"),
        })
        .expect("peer send");

    let reply = socket.recv().expect("peer receive").expect("a reply");
    println!("peer <- {}: {:?}", reply.name(), reply);

    hub.join().expect("hub thread");
}
