//! Command encoding and decoding.
//!
//! A command is one line: `<class> <state> <index>` terminated with a single
//! carriage return. The index is plain decimal with no sign or padding.

use crate::error::{ProtocolError, ProtocolResult};
use crate::port::{Port, PortClass};
use crate::vocabulary::{Dialect, State, Vocabulary};

/// Byte that terminates every command.
pub const TERMINATOR: u8 = b'\r';

/// Number of space-separated fields in a command.
pub const COMMAND_FIELDS: usize = 3;

/// A command line split into its fields, before token resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCommand<'a> {
    /// Class token as received.
    pub class: &'a str,
    /// State token as received.
    pub state: &'a str,
    /// Parsed port index.
    pub index: usize,
}

impl<'a> RawCommand<'a> {
    /// Split one command (terminator excluded) into its three fields.
    ///
    /// Fields are separated by exactly one space; `"relay  on 1"` has four
    /// fields and is rejected.
    pub fn parse(line: &'a [u8]) -> ProtocolResult<RawCommand<'a>> {
        let text = std::str::from_utf8(line).map_err(|_| ProtocolError::NotUtf8)?;
        let fields: Vec<&str> = text.split(' ').collect();
        if fields.len() != COMMAND_FIELDS {
            return Err(ProtocolError::FieldCount {
                expected: COMMAND_FIELDS,
                actual: fields.len(),
            });
        }

        let index = fields[2]
            .parse::<usize>()
            .map_err(|_| ProtocolError::InvalidIndex(fields[2].to_string()))?;

        Ok(RawCommand {
            class: fields[0],
            state: fields[1],
            index,
        })
    }
}

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Addressed port. The class is `Unknown` for unrecognised class tokens.
    pub port: Port,
    /// Requested state, or `None` when the state token is not in the vocabulary.
    pub state: Option<State>,
}

/// Encoder/decoder bound to one vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct CommandCodec {
    vocabulary: &'static Vocabulary,
}

impl Default for CommandCodec {
    fn default() -> Self {
        CommandCodec::new(Dialect::default())
    }
}

impl CommandCodec {
    /// Create a codec for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        CommandCodec {
            vocabulary: dialect.vocabulary(),
        }
    }

    /// The token table this codec uses.
    pub fn vocabulary(&self) -> &'static Vocabulary {
        self.vocabulary
    }

    /// Get the command string without the terminator.
    pub fn to_command_string(&self, port: Port, state: State) -> ProtocolResult<String> {
        let class = match port.class {
            PortClass::Relay | PortClass::Gpio => port.class.as_str(),
            PortClass::AnalogInput | PortClass::Unknown => None,
        }
        .ok_or(ProtocolError::NoClassToken(port.class))?;
        let state = self
            .vocabulary
            .state_token(port.class, state)
            .ok_or(ProtocolError::NoClassToken(port.class))?;

        Ok(format!("{} {} {}", class, state, port.number))
    }

    /// Encode a port operation as the bytes to write, including the `\r`.
    pub fn encode(&self, port: Port, state: State) -> ProtocolResult<Vec<u8>> {
        let cmd = self.to_command_string(port, state)?;
        let mut buf = Vec::with_capacity(cmd.len() + 1);
        buf.extend_from_slice(cmd.as_bytes());
        buf.push(TERMINATOR);
        Ok(buf)
    }

    /// Resolve the tokens of an already split command.
    pub fn resolve(&self, raw: &RawCommand<'_>) -> Command {
        let class = PortClass::from_token(raw.class);
        Command {
            port: Port::new(class, raw.index),
            state: self.vocabulary.resolve_state(class, raw.state),
        }
    }

    /// Decode one command line (terminator excluded).
    pub fn decode(&self, line: &[u8]) -> ProtocolResult<Command> {
        let raw = RawCommand::parse(line).map_err(|e| {
            log::trace!("rejecting command {:?}: {}", String::from_utf8_lossy(line), e);
            e
        })?;
        Ok(self.resolve(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_relay() {
        let codec = CommandCodec::default();
        assert_eq!(codec.encode(Port::relay(2), State::On).unwrap(), b"relay on 2\r");
        assert_eq!(codec.encode(Port::relay(0), State::Off).unwrap(), b"relay off 0\r");
        assert_eq!(codec.encode(Port::relay(15), State::Read).unwrap(), b"relay read 15\r");
    }

    #[test]
    fn test_encode_gpio_uniform() {
        let codec = CommandCodec::default();
        assert_eq!(codec.encode(Port::gpio(4), State::On).unwrap(), b"gpio on 4\r");
        assert_eq!(codec.encode(Port::gpio(4), State::Off).unwrap(), b"gpio off 4\r");
    }

    #[test]
    fn test_encode_gpio_set_clear() {
        let codec = CommandCodec::new(Dialect::SetClear);
        assert_eq!(codec.encode(Port::gpio(4), State::On).unwrap(), b"gpio set 4\r");
        assert_eq!(codec.encode(Port::gpio(4), State::Off).unwrap(), b"gpio clear 4\r");
        assert_eq!(codec.encode(Port::relay(1), State::On).unwrap(), b"relay on 1\r");
    }

    #[test]
    fn test_encode_without_class_token() {
        let codec = CommandCodec::default();
        let adc = Port::new(PortClass::AnalogInput, 0);
        assert_eq!(
            codec.encode(adc, State::Read),
            Err(ProtocolError::NoClassToken(PortClass::AnalogInput))
        );
        assert!(codec.encode(Port::new(PortClass::Unknown, 0), State::On).is_err());
    }

    #[test]
    fn test_parse_raw_command() {
        let raw = RawCommand::parse(b"relay on 2").unwrap();
        assert_eq!(raw.class, "relay");
        assert_eq!(raw.state, "on");
        assert_eq!(raw.index, 2);
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert_eq!(
            RawCommand::parse(b"relay on"),
            Err(ProtocolError::FieldCount { expected: 3, actual: 2 })
        );
        assert_eq!(
            RawCommand::parse(b"relay  on 1"),
            Err(ProtocolError::FieldCount { expected: 3, actual: 4 })
        );
        assert!(RawCommand::parse(b"").is_err());
    }

    #[test]
    fn test_parse_bad_index() {
        assert_eq!(
            RawCommand::parse(b"relay on two"),
            Err(ProtocolError::InvalidIndex("two".to_string()))
        );
        assert!(RawCommand::parse(b"relay on -1").is_err());
        assert_eq!(RawCommand::parse(b"relay on \xff"), Err(ProtocolError::NotUtf8));
    }

    #[test]
    fn test_decode_resolves_tokens() {
        let codec = CommandCodec::default();
        let cmd = codec.decode(b"gpio read 3").unwrap();
        assert_eq!(cmd.port, Port::gpio(3));
        assert_eq!(cmd.state, Some(State::Read));

        let cmd = codec.decode(b"fan on 1").unwrap();
        assert_eq!(cmd.port.class, PortClass::Unknown);
        assert_eq!(cmd.state, Some(State::On));

        let cmd = codec.decode(b"relay toggle 1").unwrap();
        assert_eq!(cmd.state, None);
    }
}
