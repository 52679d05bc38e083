//! End-to-end over a real byte stream: protocol sockets on both ends of
//! a Unix socket pair.

#![cfg(unix)]

use std::os::unix::net::UnixStream;

use bytes::Bytes;
use zwire::proto::zre::{ZreMsg, ZreSocket};
use zwire::transport::{SocketKind, StreamTransport};

fn stream_sockets() -> (
    ZreSocket<StreamTransport<UnixStream>>,
    ZreSocket<StreamTransport<UnixStream>>,
) {
    let (a, b) = UnixStream::pair().expect("socketpair");
    (
        ZreSocket::new(StreamTransport::new(a, SocketKind::Dealer)),
        ZreSocket::new(StreamTransport::new(b, SocketKind::Router)),
    )
}

#[test]
fn test_hello_then_whisper_over_stream() {
    let (mut dealer, mut router) = stream_sockets();

    dealer
        .send(ZreMsg::Hello {
            sequence: 1,
            ipaddress: "10.0.0.1".into(),
            mailbox: 5670,
            groups: vec!["global".into()],
            status: 1,
            headers: [("evasive", "5000")].into_iter().collect(),
        })
        .unwrap();
    dealer
        .send(ZreMsg::Whisper {
            sequence: 2,
            content: Bytes::from_static(b"hello"),
        })
        .unwrap();

    match router.recv().unwrap().expect("valid message") {
        ZreMsg::Hello {
            mailbox, headers, ..
        } => {
            assert_eq!(mailbox, 5670);
            assert_eq!(headers.get_number("evasive", 0), 5000);
        }
        other => panic!("expected HELLO, got {:?}", other),
    }

    assert_eq!(
        router.recv().unwrap(),
        Some(ZreMsg::Whisper {
            sequence: 2,
            content: Bytes::from_static(b"hello"),
        })
    );
}

#[test]
fn test_router_replies_over_stream() {
    let (mut dealer, mut router) = stream_sockets();

    dealer.send(ZreMsg::Ping { sequence: 10 }).unwrap();
    assert_eq!(router.recv().unwrap(), Some(ZreMsg::Ping { sequence: 10 }));

    router.send(ZreMsg::PingOk { sequence: 10 }).unwrap();
    assert_eq!(
        dealer.recv().unwrap(),
        Some(ZreMsg::PingOk { sequence: 10 })
    );
}

#[test]
fn test_peer_hangup_surfaces_as_error() {
    let (dealer, mut router) = stream_sockets();
    drop(dealer);

    assert!(router.recv().is_err());
}

#[test]
fn test_threaded_exchange() {
    let (mut dealer, mut router) = stream_sockets();

    let sender = std::thread::spawn(move || {
        for sequence in 0..100u16 {
            dealer
                .send(ZreMsg::Shout {
                    sequence,
                    group: "global".into(),
                    content: Bytes::from(vec![sequence as u8; 512]),
                })
                .unwrap();
        }
    });

    for sequence in 0..100u16 {
        match router.recv().unwrap().expect("valid message") {
            ZreMsg::Shout {
                sequence: got,
                group,
                content,
            } => {
                assert_eq!(got, sequence);
                assert_eq!(group, "global");
                assert_eq!(content.len(), 512);
                assert!(content.iter().all(|&b| b == sequence as u8));
            }
            other => panic!("expected SHOUT, got {:?}", other),
        }
    }

    sender.join().unwrap();
}
