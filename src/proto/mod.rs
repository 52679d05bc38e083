//! Protocol family definitions.
//!
//! One module per family, each a tagged union over that family's
//! message types plus its [`WireMessage`](crate::WireMessage)
//! implementation. Tags are 1-indexed and stable within a family; they
//! are not shared across families even where the structures look alike.

pub mod distlog;
pub mod grid;
pub mod zre;
pub mod zre_log;
