//! Serial port transport.

use std::io::{self, Read, Write};
use std::time::Duration;

use numato_protocol::{Dialect, Transport};
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use tracing::debug;

use crate::error::Result;

/// Baud rate Numato modules ship with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Read timeout after which the port reports "no data available".
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Settings for opening a device over a serial port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyACM0` or `COM3`.
    pub path: String,
    /// Line speed.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Command vocabulary the firmware speaks.
    #[serde(default)]
    pub dialect: Dialect,
}

impl SerialConfig {
    /// Default settings for the device at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        SerialConfig {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            dialect: Dialect::default(),
        }
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// A Numato module attached to a serial port.
pub struct SerialTransport {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open and configure the serial port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud_rate)
            .timeout(config.read_timeout())
            .open()?;
        debug!(
            "SerialTransport[{}]: opened at {} baud, {:?} timeout",
            config.path,
            config.baud_rate,
            config.read_timeout()
        );

        Ok(SerialTransport {
            path: config.path.clone(),
            port,
        })
    }

    /// Path the port was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl Transport for SerialTransport {
    /// Flush pending output. The port itself is released when dropped.
    fn close(&mut self) -> io::Result<()> {
        self.port.flush()?;
        debug!("SerialTransport[{}]: closed", self.path);
        Ok(())
    }
}
