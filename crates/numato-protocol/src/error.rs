//! Error types for the Numato command protocol.

use thiserror::Error;

use crate::port::PortClass;

/// Errors that can occur when encoding or decoding protocol commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A command line did not split into `<class> <state> <index>`.
    #[error("expected {expected} space-separated fields, got {actual}")]
    FieldCount {
        /// Number of fields a command must have.
        expected: usize,
        /// Number of fields actually found.
        actual: usize,
    },

    /// The index field is not a non-negative base-10 integer.
    #[error("invalid port index: {0:?}")]
    InvalidIndex(String),

    /// The command bytes are not valid UTF-8.
    #[error("command is not valid UTF-8")]
    NotUtf8,

    /// The port class has no command token, so it cannot be written.
    #[error("port class {0:?} has no command token")]
    NoClassToken(PortClass),

    /// A port description could not be parsed.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// A state name could not be parsed.
    #[error("invalid state: {0:?}")]
    InvalidState(String),
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
