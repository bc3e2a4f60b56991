//! Port addressing.
//!
//! A port is a `(class, number)` pair. Ports are plain values: nothing is
//! validated at construction, the device (or simulator) that owns the state
//! decides whether an address exists.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// The category of an addressable port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PortClass {
    /// Relay output (`relay`)
    Relay,
    /// General purpose I/O pin (`gpio`)
    Gpio,
    /// Analog input channel (`adc`)
    AnalogInput,
    /// Any class token the protocol does not know.
    Unknown,
}

impl PortClass {
    /// Get the token used for this class in commands.
    ///
    /// `Unknown` has no token; `AnalogInput` has a token but no state
    /// commands in the supported protocol subset.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            PortClass::Relay => Some("relay"),
            PortClass::Gpio => Some("gpio"),
            PortClass::AnalogInput => Some("adc"),
            PortClass::Unknown => None,
        }
    }

    /// Resolve a class token. Unrecognised tokens map to `Unknown`.
    pub fn from_token(s: &str) -> PortClass {
        match s {
            "relay" => PortClass::Relay,
            "gpio" => PortClass::Gpio,
            "adc" => PortClass::AnalogInput,
            _ => PortClass::Unknown,
        }
    }
}

impl fmt::Display for PortClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unknown"))
    }
}

/// A single addressable relay, GPIO pin or analog input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Port {
    /// Port category.
    pub class: PortClass,
    /// Zero-based index within the category.
    pub number: usize,
}

impl Port {
    /// Create a port address.
    pub const fn new(class: PortClass, number: usize) -> Self {
        Port { class, number }
    }

    /// Shorthand for `Port::new(PortClass::Relay, number)`.
    pub const fn relay(number: usize) -> Self {
        Port::new(PortClass::Relay, number)
    }

    /// Shorthand for `Port::new(PortClass::Gpio, number)`.
    pub const fn gpio(number: usize) -> Self {
        Port::new(PortClass::Gpio, number)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.class, self.number)
    }
}

/// Parses `relay:3` or `relay 3`. The class must be a known token.
impl FromStr for Port {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, number) = s
            .trim()
            .split_once([':', ' '])
            .ok_or_else(|| ProtocolError::InvalidPort(s.to_string()))?;

        let class = match PortClass::from_token(&class.to_ascii_lowercase()) {
            PortClass::Unknown => return Err(ProtocolError::InvalidPort(s.to_string())),
            class => class,
        };
        let number = number
            .trim()
            .parse::<usize>()
            .map_err(|_| ProtocolError::InvalidPort(s.to_string()))?;

        Ok(Port::new(class, number))
    }
}
