//! Log-shipping demo: a shipper streams log lines to a store, then asks
//! for a replay of a line range.
//!
//! Run with `cargo run --example log_shipper`.

use zwire::proto::distlog::{DistLogMsg, DistLogSocket};
use zwire::transport::{pair, SocketKind};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let (ship_end, store_end) = pair(SocketKind::Dealer, SocketKind::Router);
    let mut shipper = DistLogSocket::new(ship_end);
    let mut store = DistLogSocket::new(store_end);

    let mut kept: Vec<String> = Vec::new();

    for (line_num, line) in ["service started", "listening on :5555", "peer connected"]
        .iter()
        .enumerate()
    {
        shipper
            .send(DistLogMsg::Log {
                sequence: line_num as u32,
                headers: [("app", "demo")].into_iter().collect(),
                ip: "192.168.1.10".into(),
                port: 5555,
                file_name: "/var/log/demo.log".into(),
                line_num: line_num as u32,
                message: (*line).into(),
            })
            .expect("ship log line");
    }

    while kept.len() < 3 {
        if let Some(DistLogMsg::Log { message, .. }) = store.recv().expect("store receive") {
            kept.push(message);
        }
    }
    println!("store holds {} lines", kept.len());

    shipper
        .send(DistLogMsg::Request {
            sequence: 99,
            file_name: "/var/log/demo.log".into(),
            start: 0,
            end: 2,
        })
        .expect("request replay");

    if let Some(DistLogMsg::Request { start, end, .. }) = store.recv().expect("store receive") {
        store
            .send(DistLogMsg::Reply {
                sequence: 99,
                headers: [("count", (end - start + 1).to_string())].into_iter().collect(),
                messages: kept[start as usize..=end as usize].to_vec(),
            })
            .expect("send replay");
    }

    match shipper.recv().expect("shipper receive") {
        Some(DistLogMsg::Reply { messages, .. }) => {
            for line in messages {
                println!("replayed: {}", line);
            }
        }
        other => println!("unexpected: {:?}", other),
    }
}
