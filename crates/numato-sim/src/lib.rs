//! Numato Device Simulator
//!
//! An in-memory stand-in for a Numato USB relay/GPIO module. It implements
//! the same [`Transport`](numato_protocol::Transport) contract as a serial
//! port: bytes written are echoed, complete command lines are executed
//! against a state table, and status words and prompts are queued for the
//! reader exactly as the hardware frames them.
//!
//! Only the commands the client library generates are understood. Anything
//! else is echoed and otherwise ignored.
//!
//! # Example
//!
//! ```rust
//! use std::io::{Read, Write};
//! use numato_protocol::Port;
//! use numato_sim::Simulator;
//!
//! let mut sim = Simulator::new(4, 0, 0);
//! sim.write_all(b"relay on 2\r").unwrap();
//! assert!(sim.is_on(Port::relay(2)));
//!
//! let mut out = Vec::new();
//! sim.read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"relay on 2\rrelay on 2\r\n\r> ");
//! ```

mod shared;
mod simulator;

pub use shared::*;
pub use simulator::*;
