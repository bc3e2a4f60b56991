//! The device client.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use numato_protocol::{
    is_end_of_stream, parse_status, CommandCodec, Dialect, Port, State, Transport,
};
use tracing::{debug, trace};

use crate::error::Result;
use crate::serial::{SerialConfig, SerialTransport};

/// Size of the buffer a query response is read into.
pub const QUERY_BUFFER_LEN: usize = 64;

/// Longest time spent discarding stale output before a query. Only a
/// transport that never goes quiet hits this.
const MAX_DRAIN_TIME: Duration = Duration::from_millis(500);

/// A Numato USB relay/GPIO module.
///
/// The client owns its transport and caches nothing: every query goes to the
/// device. Dropping the client releases the transport; [`close`](Self::close)
/// does the same but reports any error from the release.
#[derive(Debug)]
pub struct Numato<T: Transport> {
    transport: T,
    codec: CommandCodec,
}

impl Numato<SerialTransport> {
    /// Open the device at `path` with the default line settings.
    pub fn open(path: &str) -> Result<Self> {
        Numato::open_with(&SerialConfig::new(path))
    }

    /// Open a device with explicit serial settings.
    pub fn open_with(config: &SerialConfig) -> Result<Self> {
        let transport = SerialTransport::open(config)?;
        Ok(Numato::with_dialect(transport, config.dialect))
    }
}

#[cfg(feature = "simulator")]
impl Numato<numato_sim::SharedSimulator> {
    /// Create a simulated device and a client driving it.
    ///
    /// The returned simulator handle shares state with the client's
    /// transport, so it can be used to inspect or force port levels.
    pub fn open_simulator(relays: u8, gpios: u8, adcs: u8) -> (numato_sim::SharedSimulator, Self) {
        let sim = numato_sim::SharedSimulator::new(relays, gpios, adcs);
        (sim.clone(), Numato::new(sim))
    }
}

impl<T: Transport> Numato<T> {
    /// Wrap an already open transport, using the default dialect.
    pub fn new(transport: T) -> Self {
        Numato::with_dialect(transport, Dialect::default())
    }

    /// Wrap a transport whose device speaks `dialect`.
    pub fn with_dialect(transport: T, dialect: Dialect) -> Self {
        Numato {
            transport,
            codec: CommandCodec::new(dialect),
        }
    }

    /// Turn a port on.
    pub fn on(&mut self, port: Port) -> Result<()> {
        self.set(port, State::On)
    }

    /// Turn a port off.
    pub fn off(&mut self, port: Port) -> Result<()> {
        self.set(port, State::Off)
    }

    /// Send the command for `state` to `port`.
    ///
    /// Sending `State::Read` only issues the query; use [`query`](Self::query)
    /// to read the answer.
    pub fn set(&mut self, port: Port, state: State) -> Result<()> {
        let line = self.codec.encode(port, state)?;
        debug!("Numato: {} {}", port, state);
        self.transport.write_all(&line)?;
        Ok(())
    }

    /// Ask the device whether `port` is on.
    ///
    /// The device needs a moment to push the whole response out, so the
    /// response is read twice: whatever is available, then immediately
    /// whatever followed. Running out of data on the second read is expected.
    /// Only a framed `on` counts as on; any other answer reads as off.
    pub fn query(&mut self, port: Port) -> Result<bool> {
        self.discard_stale_output();
        self.set(port, State::Read)?;

        let mut buf = [0u8; QUERY_BUFFER_LEN];
        let first = self.transport.read(&mut buf)?;
        let second = match self.transport.read(&mut buf[first..]) {
            Ok(n) => n,
            Err(e) if is_end_of_stream(&e) => 0,
            Err(e) => return Err(e.into()),
        };
        let response = &buf[..first + second];
        trace!(
            "Numato: query {} read {}+{} bytes {:?}",
            port,
            first,
            second,
            String::from_utf8_lossy(response)
        );

        Ok(parse_status(response))
    }

    /// Release the transport.
    pub fn close(mut self) -> Result<()> {
        self.transport.close()?;
        Ok(())
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Throw away echoes and prompts left over from earlier commands so they
    /// cannot push the answer to the next query out of the read buffer.
    ///
    /// Reads until the transport has nothing more (`Ok(0)` or any error).
    fn discard_stale_output(&mut self) {
        let mut buf = [0u8; QUERY_BUFFER_LEN];
        let started = Instant::now();
        let mut discarded = 0;
        loop {
            match self.transport.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => discarded += n,
            }
            if started.elapsed() >= MAX_DRAIN_TIME {
                debug!("Numato: output still arriving after {:?}", MAX_DRAIN_TIME);
                break;
            }
        }
        if discarded > 0 {
            trace!("Numato: discarded {} stale bytes", discarded);
        }
    }
}
