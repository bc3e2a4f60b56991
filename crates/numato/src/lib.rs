//! Numato USB Relay/GPIO Driver
//!
//! Control Numato Lab USB digital I/O modules: switch relays and GPIO pins
//! on or off and read their current level. The driver speaks the module's
//! text shell over any [`Transport`]: a real serial port, or the in-memory
//! simulator from `numato-sim` (enabled by the default `simulator` feature).
//!
//! # Example
//!
//! ```rust
//! use numato::{Numato, Port};
//!
//! let (sim, mut relay_board) = Numato::open_simulator(4, 0, 0);
//! relay_board.on(Port::relay(1)).unwrap();
//! assert!(relay_board.query(Port::relay(1)).unwrap());
//! assert!(sim.is_on(Port::relay(1)));
//! relay_board.close().unwrap();
//! ```
//!
//! Against hardware:
//!
//! ```rust,no_run
//! use numato::{Numato, Port};
//!
//! let mut board = Numato::open("/dev/ttyACM0")?;
//! board.on(Port::gpio(3))?;
//! board.close()?;
//! # Ok::<(), numato::NumatoError>(())
//! ```

mod client;
mod error;
mod serial;

pub use client::*;
pub use error::*;
pub use serial::*;

pub use numato_protocol::{Dialect, Port, PortClass, State, Transport};

#[cfg(feature = "simulator")]
pub use numato_sim::{SharedSimulator, Simulator};
