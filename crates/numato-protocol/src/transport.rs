//! Abstract byte stream between a client and a device.

use std::io::{self, Read, Write};

/// A byte stream a Numato device can be reached over.
///
/// Implemented by the serial port transport and by the simulator, so the
/// same client code drives either.
pub trait Transport: Read + Write {
    /// Release the underlying resource.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Whether a read error just means "nothing more to read right now".
///
/// Serial ports signal an expired read timeout with `TimedOut`; in-memory
/// streams return `Ok(0)` instead, which callers check separately.
pub fn is_end_of_stream(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::UnexpectedEof
    )
}
