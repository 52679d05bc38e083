//! # zwire
//!
//! Binary wire codecs for a family of small frame-oriented messaging
//! protocols: Grid clustering, ZRE peer-to-peer messaging, ZRE cluster
//! logging, and distributed log shipping.
//!
//! This is a pure codec layer, `(bytes) <-> (typed message)`. Every
//! family shares one envelope shape (a 2-byte signature, a 1-byte type
//! tag, then the variant's fields) and one field vocabulary (big-endian
//! unsigned integers, 1-byte-length strings, string arrays, `key=value`
//! dictionaries, and opaque content carried in a separate frame). The
//! shared parts live in [`wire`], [`message`] and [`socket`]; each
//! family contributes only its tagged union.
//!
//! ## Architecture
//!
//! - **Frame codec** ([`wire`]): cursor-based field primitives inside
//!   one contiguous frame buffer.
//! - **Message models** ([`proto`]): one enum per protocol family.
//! - **Socket adapter** ([`socket`]): reads and writes whole logical
//!   messages (address frame, envelope, content frame) over a
//!   [`transport::Transport`], tolerating garbage traffic from other
//!   protocols sharing the wire.
//!
//! ## Example
//!
//! ```
//! use zwire::proto::grid::{GridMsg, GridSocket};
//! use zwire::transport::{pair, SocketKind};
//!
//! let (out, inp) = pair(SocketKind::Dealer, SocketKind::Router);
//! let mut output = GridSocket::new(out);
//! let mut input = GridSocket::new(inp);
//!
//! output
//!     .send(GridMsg::Connect {
//!         sequence: 123,
//!         ip: "10.0.0.1".into(),
//!         port: 5555,
//!         clusters: vec!["a".into(), "b".into()],
//!         status: 1,
//!         headers: [("x", "1")].into_iter().collect(),
//!     })
//!     .unwrap();
//!
//! match input.recv().unwrap() {
//!     Some(GridMsg::Connect { headers, .. }) => {
//!         assert_eq!(headers.get_number("x", 0), 1);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

pub mod error;
pub mod headers;
pub mod message;
pub mod proto;
pub mod socket;
pub mod transport;
pub mod wire;

pub use error::{Result, ZwireError};
pub use headers::Headers;
pub use message::WireMessage;
pub use socket::MessageSocket;
