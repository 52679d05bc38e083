//! ZRE protocol: every message type encoded, sent and decoded through a
//! connected dealer/router pair.

use bytes::Bytes;
use zwire::proto::zre::{ZreMsg, ZreSocket};
use zwire::transport::{pair, SocketKind};

fn sockets() -> (
    ZreSocket<zwire::transport::PairTransport>,
    ZreSocket<zwire::transport::PairTransport>,
) {
    let (out, inp) = pair(SocketKind::Dealer, SocketKind::Router);
    (ZreSocket::new(out), ZreSocket::new(inp))
}

#[test]
fn test_hello() {
    let (mut output, mut input) = sockets();

    output
        .send(ZreMsg::Hello {
            sequence: 123,
            ipaddress: "Life is short but Now lasts for ever".into(),
            mailbox: 123,
            groups: vec!["Name: Brutus".into(), "Age: 43".into()],
            status: 123,
            headers: [("Name", "Brutus"), ("Age", "43")].into_iter().collect(),
        })
        .unwrap();

    let msg = input.recv().unwrap().expect("valid message");
    match msg {
        ZreMsg::Hello {
            sequence,
            ipaddress,
            mailbox,
            groups,
            status,
            headers,
        } => {
            assert_eq!(sequence, 123);
            assert_eq!(ipaddress, "Life is short but Now lasts for ever");
            assert_eq!(mailbox, 123);
            assert_eq!(groups, vec!["Name: Brutus", "Age: 43"]);
            assert_eq!(status, 123);
            assert_eq!(headers.len(), 2);
            assert_eq!(headers.get("Name", "?"), "Brutus");
            assert_eq!(headers.get_number("Age", 0), 43);
        }
        other => panic!("expected HELLO, got {:?}", other),
    }
    // The router learned where the message came from.
    assert!(input.address().is_some());
}

#[test]
fn test_whisper_content_travels_in_own_frame() {
    let (mut output, mut input) = sockets();

    output
        .send(ZreMsg::Whisper {
            sequence: 7,
            content: Bytes::from_static(b"hello"),
        })
        .unwrap();

    let msg = input.recv().unwrap().expect("valid message");
    match msg {
        ZreMsg::Whisper { sequence, content } => {
            assert_eq!(sequence, 7);
            // Exact content, no envelope leakage.
            assert_eq!(&content[..], b"hello");
        }
        other => panic!("expected WHISPER, got {:?}", other),
    }
}

#[test]
fn test_shout() {
    let (mut output, mut input) = sockets();

    output
        .send(ZreMsg::Shout {
            sequence: 123,
            group: "Life is short but Now lasts for ever".into(),
            content: Bytes::from_static(b"Captcha Diem"),
        })
        .unwrap();

    let msg = input.recv().unwrap().expect("valid message");
    assert_eq!(
        msg,
        ZreMsg::Shout {
            sequence: 123,
            group: "Life is short but Now lasts for ever".into(),
            content: Bytes::from_static(b"Captcha Diem"),
        }
    );
}

#[test]
fn test_join_leave() {
    let (mut output, mut input) = sockets();

    output
        .send(ZreMsg::Join {
            sequence: 123,
            group: "a group".into(),
            status: 123,
        })
        .unwrap();
    output
        .send(ZreMsg::Leave {
            sequence: 124,
            group: "a group".into(),
            status: 123,
        })
        .unwrap();

    assert_eq!(
        input.recv().unwrap(),
        Some(ZreMsg::Join {
            sequence: 123,
            group: "a group".into(),
            status: 123,
        })
    );
    assert_eq!(
        input.recv().unwrap(),
        Some(ZreMsg::Leave {
            sequence: 124,
            group: "a group".into(),
            status: 123,
        })
    );
}

#[test]
fn test_ping_and_reply_through_router() {
    let (mut output, mut input) = sockets();

    output.send(ZreMsg::Ping { sequence: 123 }).unwrap();
    assert_eq!(input.recv().unwrap(), Some(ZreMsg::Ping { sequence: 123 }));

    // The router replies to the address it just learned.
    input.send(ZreMsg::PingOk { sequence: 123 }).unwrap();
    assert_eq!(
        output.recv().unwrap(),
        Some(ZreMsg::PingOk { sequence: 123 })
    );
}

#[test]
fn test_empty_collections_roundtrip() {
    let (mut output, mut input) = sockets();

    output
        .send(ZreMsg::Hello {
            sequence: 1,
            ipaddress: String::new(),
            mailbox: 0,
            groups: Vec::new(),
            status: 0,
            headers: zwire::Headers::new(),
        })
        .unwrap();

    match input.recv().unwrap().expect("valid message") {
        ZreMsg::Hello {
            ipaddress,
            groups,
            headers,
            ..
        } => {
            assert!(ipaddress.is_empty());
            assert!(groups.is_empty());
            assert!(headers.is_empty());
        }
        other => panic!("expected HELLO, got {:?}", other),
    }
}
