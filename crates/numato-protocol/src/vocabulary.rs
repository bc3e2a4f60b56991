//! State tokens and the per-dialect vocabulary tables.
//!
//! Two wire dialects exist for Numato modules. Firmware in the field accepts
//! `on`/`off`/`read` for every port class; an older variant used
//! `set`/`clear` for GPIO pins. The encoder and decoder must agree on one, so
//! the dialect is always chosen explicitly and `Uniform` is the default.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;
use crate::port::PortClass;

/// Protocol-level port state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum State {
    /// Port energised / pin high.
    On,
    /// Port released / pin low.
    Off,
    /// Query pseudo-state. Never stored, only sent to ask for the current state.
    Read,
}

impl State {
    /// Canonical lowercase name (`on`, `off`, `read`).
    pub fn as_str(&self) -> &'static str {
        match self {
            State::On => "on",
            State::Off => "off",
            State::Read => "read",
        }
    }

    /// Map a boolean port level to `On`/`Off`.
    pub fn from_level(on: bool) -> State {
        if on {
            State::On
        } else {
            State::Off
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(State::On),
            "off" => Ok(State::Off),
            "read" => Ok(State::Read),
            _ => Err(ProtocolError::InvalidState(s.to_string())),
        }
    }
}

/// Tokens used for each state of one port class.
#[derive(Debug, PartialEq, Eq)]
pub struct StateTokens {
    /// Token for `State::On`.
    pub on: &'static str,
    /// Token for `State::Off`.
    pub off: &'static str,
    /// Token for `State::Read`.
    pub read: &'static str,
}

impl StateTokens {
    fn token(&self, state: State) -> &'static str {
        match state {
            State::On => self.on,
            State::Off => self.off,
            State::Read => self.read,
        }
    }

    fn resolve(&self, token: &str) -> Option<State> {
        if token == self.on {
            Some(State::On)
        } else if token == self.off {
            Some(State::Off)
        } else if token == self.read {
            Some(State::Read)
        } else {
            None
        }
    }
}

const ON_OFF_READ: StateTokens = StateTokens {
    on: "on",
    off: "off",
    read: "read",
};

const SET_CLEAR_READ: StateTokens = StateTokens {
    on: "set",
    off: "clear",
    read: "read",
};

/// Immutable token table shared by the encoder and the decoder.
#[derive(Debug, PartialEq, Eq)]
pub struct Vocabulary {
    /// Tokens for relay commands.
    pub relay: StateTokens,
    /// Tokens for GPIO commands.
    pub gpio: StateTokens,
}

/// `on`/`off`/`read` for every class.
pub static UNIFORM: Vocabulary = Vocabulary {
    relay: ON_OFF_READ,
    gpio: ON_OFF_READ,
};

/// `on`/`off`/`read` for relays, `set`/`clear`/`read` for GPIO.
pub static SET_CLEAR: Vocabulary = Vocabulary {
    relay: ON_OFF_READ,
    gpio: SET_CLEAR_READ,
};

impl Vocabulary {
    fn tokens(&self, class: PortClass) -> Option<&StateTokens> {
        match class {
            PortClass::Relay => Some(&self.relay),
            PortClass::Gpio => Some(&self.gpio),
            PortClass::AnalogInput | PortClass::Unknown => None,
        }
    }

    /// Token to send for `state` on a port of `class`.
    ///
    /// Returns `None` for classes with no state commands.
    pub fn state_token(&self, class: PortClass, state: State) -> Option<&'static str> {
        self.tokens(class).map(|t| t.token(state))
    }

    /// Resolve a received state token for a port of `class`.
    ///
    /// Classes without their own table (analog inputs, unknown tokens) are
    /// resolved against the relay table, so the device still reaches the
    /// addressing check for them.
    pub fn resolve_state(&self, class: PortClass, token: &str) -> Option<State> {
        self.tokens(class).unwrap_or(&self.relay).resolve(token)
    }
}

/// Which vocabulary a client or simulator speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Dialect {
    /// `on`/`off`/`read` for every class.
    #[default]
    Uniform,
    /// Legacy GPIO tokens `set`/`clear`.
    SetClear,
}

impl Dialect {
    /// Static token table for this dialect.
    pub fn vocabulary(&self) -> &'static Vocabulary {
        match self {
            Dialect::Uniform => &UNIFORM,
            Dialect::SetClear => &SET_CLEAR,
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Dialect::Uniform),
            "set-clear" => Ok(Dialect::SetClear),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_tokens() {
        let v = Dialect::Uniform.vocabulary();
        assert_eq!(v.state_token(PortClass::Relay, State::On), Some("on"));
        assert_eq!(v.state_token(PortClass::Gpio, State::Off), Some("off"));
        assert_eq!(v.state_token(PortClass::Gpio, State::Read), Some("read"));
        assert_eq!(v.state_token(PortClass::AnalogInput, State::On), None);
    }

    #[test]
    fn test_set_clear_tokens() {
        let v = Dialect::SetClear.vocabulary();
        assert_eq!(v.state_token(PortClass::Relay, State::On), Some("on"));
        assert_eq!(v.state_token(PortClass::Gpio, State::On), Some("set"));
        assert_eq!(v.state_token(PortClass::Gpio, State::Off), Some("clear"));
        assert_eq!(v.resolve_state(PortClass::Gpio, "clear"), Some(State::Off));
        assert_eq!(v.resolve_state(PortClass::Gpio, "off"), None);
    }

    #[test]
    fn test_resolve_unknown_class_uses_relay_table() {
        let v = Dialect::Uniform.vocabulary();
        assert_eq!(v.resolve_state(PortClass::Unknown, "on"), Some(State::On));
        assert_eq!(v.resolve_state(PortClass::AnalogInput, "read"), Some(State::Read));
        assert_eq!(v.resolve_state(PortClass::Relay, "toggle"), None);
    }

    #[test]
    fn test_parse_state() {
        assert_eq!("on".parse::<State>().unwrap(), State::On);
        assert_eq!("OFF".parse::<State>().unwrap(), State::Off);
        assert_eq!("read".parse::<State>().unwrap(), State::Read);
        assert!("toggle".parse::<State>().is_err());
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("uniform".parse::<Dialect>().unwrap(), Dialect::Uniform);
        assert_eq!("set-clear".parse::<Dialect>().unwrap(), Dialect::SetClear);
        assert!("legacy".parse::<Dialect>().is_err());
    }
}
