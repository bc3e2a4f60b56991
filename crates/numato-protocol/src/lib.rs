//! Numato USB GPIO/Relay Command Protocol
//!
//! This crate provides types and utilities for talking to Numato Lab USB
//! digital I/O modules (relay boards, GPIO modules) over their serial CLI.
//! The device exposes a simple line-based text shell; every port operation is
//! a single command line.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → device): `<class> <state> <index>` terminated with `\r`
//! - **Echo**: every byte written is echoed back on the read side
//! - **Status responses** (device → host): `\n\r<on|off>\n\r` after a `read`
//! - **Prompt**: `\n\r> ` once the command has been handled
//!
//! # Example
//!
//! ```rust
//! use numato_protocol::{CommandCodec, Port, PortClass, State};
//!
//! let codec = CommandCodec::default();
//! let line = codec.encode(Port::new(PortClass::Relay, 2), State::On).unwrap();
//! assert_eq!(line, b"relay on 2\r");
//! ```

mod codec;
mod error;
mod port;
mod responses;
mod transport;
mod vocabulary;

pub use codec::*;
pub use error::*;
pub use port::*;
pub use responses::*;
pub use transport::*;
pub use vocabulary::*;
