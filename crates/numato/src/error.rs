//! Error types for the Numato driver.

use numato_protocol::ProtocolError;
use thiserror::Error;

/// Errors returned by [`Numato`](crate::Numato) operations.
#[derive(Debug, Error)]
pub enum NumatoError {
    /// The byte stream failed on write, read or close.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The operation cannot be expressed as a device command.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, NumatoError>;
