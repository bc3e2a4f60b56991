//! Shareable simulator handle.
//!
//! A client takes exclusive ownership of its transport. Tests still want to
//! look at the simulated state behind the client's back, so the simulator is
//! wrapped in a cloneable handle: one clone goes to the client, the other
//! stays with the caller.

use std::io::{self, Read, Write};
use std::sync::Arc;

use numato_protocol::{Dialect, Port, PortClass, State, Transport};
use parking_lot::Mutex;
use tracing::debug;

use crate::simulator::Simulator;

/// Cloneable, thread-safe handle to one [`Simulator`].
///
/// Each write is executed under a single lock, so the echo and the output of
/// the commands it completes are queued together.
#[derive(Debug, Clone)]
pub struct SharedSimulator {
    inner: Arc<Mutex<Simulator>>,
}

impl SharedSimulator {
    /// Create a simulator with the given port counts.
    pub fn new(relays: u8, gpios: u8, adcs: u8) -> Self {
        SharedSimulator::from(Simulator::new(relays, gpios, adcs))
    }

    /// Create a simulator that speaks `dialect`.
    pub fn with_dialect(relays: u8, gpios: u8, adcs: u8, dialect: Dialect) -> Self {
        SharedSimulator::from(Simulator::with_dialect(relays, gpios, adcs, dialect))
    }

    /// Force a port to `state`. See [`Simulator::set`].
    pub fn set(&self, port: Port, state: State) {
        self.inner.lock().set(port, state);
    }

    /// Turn the simulated port on.
    pub fn on(&self, port: Port) {
        self.inner.lock().on(port);
    }

    /// Turn the simulated port off.
    pub fn off(&self, port: Port) {
        self.inner.lock().off(port);
    }

    /// Current level of a port as the simulator sees it.
    pub fn is_on(&self, port: Port) -> bool {
        self.inner.lock().is_on(port)
    }

    /// Declared number of ports of `class`.
    pub fn capacity(&self, class: PortClass) -> usize {
        self.inner.lock().capacity(class)
    }

    /// Number of bytes waiting to be read.
    pub fn buffered_len(&self) -> usize {
        self.inner.lock().buffered_len()
    }

    /// Copy of the incomplete command fragment, if any.
    pub fn pending(&self) -> Vec<u8> {
        self.inner.lock().pending().to_vec()
    }

    /// Run `f` with exclusive access to the simulator.
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulator) -> R) -> R {
        let mut sim = self.inner.lock();
        f(&mut *sim)
    }
}

impl From<Simulator> for SharedSimulator {
    fn from(sim: Simulator) -> Self {
        SharedSimulator {
            inner: Arc::new(Mutex::new(sim)),
        }
    }
}

impl Read for SharedSimulator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.lock().read(buf)
    }
}

impl Write for SharedSimulator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for SharedSimulator {
    fn close(&mut self) -> io::Result<()> {
        debug!("Simulator: transport closed");
        Ok(())
    }
}
