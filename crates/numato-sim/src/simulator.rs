//! The simulated device.

use std::collections::HashMap;
use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use numato_protocol::{
    status_frame, CommandCodec, Dialect, Port, PortClass, State, Transport, PROMPT, TERMINATOR,
};
use tracing::{debug, trace};

/// Initial capacity of the output queue.
const OUTPUT_CAPACITY: usize = 256;

/// A dummy Numato module.
///
/// Writes are parsed as a byte stream: a command may arrive split over any
/// number of writes and is executed once its `\r` arrives. Everything written
/// is echoed on the read side before the output of any command it completes.
///
/// Addressing a port that does not exist (unknown class, index at or beyond
/// the declared capacity) is a caller bug and panics.
#[derive(Debug)]
pub struct Simulator {
    relays: u8,
    gpios: u8,
    adcs: u8,
    state: HashMap<PortClass, Vec<bool>>,
    codec: CommandCodec,
    /// Bytes waiting to be read, oldest first.
    output: BytesMut,
    /// Bytes written since the last terminator. Never contains `\r`.
    pending: BytesMut,
}

impl Simulator {
    /// Create a simulator with the given port counts, speaking the default dialect.
    ///
    /// Analog inputs are accepted for completeness but hold no state.
    pub fn new(relays: u8, gpios: u8, adcs: u8) -> Self {
        Simulator::with_dialect(relays, gpios, adcs, Dialect::default())
    }

    /// Create a simulator that decodes commands with `dialect`.
    pub fn with_dialect(relays: u8, gpios: u8, adcs: u8, dialect: Dialect) -> Self {
        let mut state = HashMap::new();
        state.insert(PortClass::Relay, vec![false; relays as usize]);
        state.insert(PortClass::Gpio, vec![false; gpios as usize]);

        Simulator {
            relays,
            gpios,
            adcs,
            state,
            codec: CommandCodec::new(dialect),
            output: BytesMut::with_capacity(OUTPUT_CAPACITY),
            pending: BytesMut::new(),
        }
    }

    /// Declared number of ports of `class`.
    pub fn capacity(&self, class: PortClass) -> usize {
        match class {
            PortClass::Relay => self.relays as usize,
            PortClass::Gpio => self.gpios as usize,
            PortClass::AnalogInput => self.adcs as usize,
            PortClass::Unknown => 0,
        }
    }

    /// Force a port to `state`.
    ///
    /// `State::Read` checks the address but changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if the port class has no state table or the index is out of range.
    pub fn set(&mut self, port: Port, state: State) {
        let slot = self.slot_mut(port);
        match state {
            State::On => *slot = true,
            State::Off => *slot = false,
            State::Read => return,
        }
        debug!("Simulator: {} -> {}", port, state);
    }

    /// Turn the simulated port on.
    pub fn on(&mut self, port: Port) {
        self.set(port, State::On);
    }

    /// Turn the simulated port off.
    pub fn off(&mut self, port: Port) {
        self.set(port, State::Off);
    }

    /// Current level of a port as the simulator sees it.
    ///
    /// # Panics
    ///
    /// Panics if the port class has no state table or the index is out of range.
    pub fn is_on(&self, port: Port) -> bool {
        *self.slot(port)
    }

    /// Bytes of an incomplete command still waiting for their terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Number of bytes waiting to be read.
    pub fn buffered_len(&self) -> usize {
        self.output.len()
    }

    /// Take everything waiting to be read.
    pub fn take_output(&mut self) -> Bytes {
        self.output.split().freeze()
    }

    fn states(&self, port: Port) -> &Vec<bool> {
        match self.state.get(&port.class) {
            Some(states) => states,
            None => panic!("invalid port class: {:?}", port.class),
        }
    }

    fn slot(&self, port: Port) -> &bool {
        let states = self.states(port);
        match states.get(port.number) {
            Some(slot) => slot,
            None => panic!("port out of range: {} (capacity {})", port, states.len()),
        }
    }

    fn slot_mut(&mut self, port: Port) -> &mut bool {
        let states = match self.state.get_mut(&port.class) {
            Some(states) => states,
            None => panic!("invalid port class: {:?}", port.class),
        };
        let capacity = states.len();
        match states.get_mut(port.number) {
            Some(slot) => slot,
            None => panic!("port out of range: {} (capacity {})", port, capacity),
        }
    }

    /// Echo `data`, then run every command it completes.
    fn feed(&mut self, data: &[u8]) {
        self.output.extend_from_slice(data);

        let mut rest = data;
        while let Some(pos) = rest.iter().position(|&b| b == TERMINATOR) {
            self.pending.extend_from_slice(&rest[..pos]);
            let line = self.pending.split().freeze();
            self.process(&line);
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
    }

    /// Execute one complete command (terminator excluded).
    fn process(&mut self, line: &[u8]) {
        // The device echoes the command line once more as it executes it.
        self.output.extend_from_slice(line);
        self.output.put_u8(TERMINATOR);

        let cmd = match self.codec.decode(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                trace!("Simulator: ignoring {:?}: {}", String::from_utf8_lossy(line), e);
                return;
            }
        };
        trace!("Simulator: processing {:?}", cmd);

        match cmd.state {
            Some(state @ (State::On | State::Off)) => self.set(cmd.port, state),
            Some(State::Read) => {
                let on = self.is_on(cmd.port);
                self.output.extend_from_slice(&status_frame(on));
            }
            None => trace!(
                "Simulator: unrecognised state in {:?}",
                String::from_utf8_lossy(line)
            ),
        }

        self.output.extend_from_slice(PROMPT);
    }
}

impl Read for Simulator {
    /// Drain queued output. Returns `Ok(0)` when nothing is queued; never blocks.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.output.len());
        buf[..n].copy_from_slice(&self.output[..n]);
        self.output.advance(n);
        Ok(n)
    }
}

impl Write for Simulator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for Simulator {}
