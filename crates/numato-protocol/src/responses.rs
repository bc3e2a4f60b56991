//! Response framing.
//!
//! After echoing a command the device answers a `read` with the state word
//! wrapped in `\n\r` on both sides, then prints its prompt:
//!
//! ```text
//! relay read 0\r\n\ron\n\r\n\r>
//! ```

/// Line break the device emits around status words and before the prompt.
pub const FRAME: &[u8] = b"\n\r";

/// Prompt printed after every handled command.
pub const PROMPT: &[u8] = b"\n\r> ";

/// Build the framed status word for a port level, e.g. `\n\ron\n\r`.
pub fn status_frame(on: bool) -> Vec<u8> {
    let word: &[u8] = if on { b"on" } else { b"off" };
    let mut buf = Vec::with_capacity(word.len() + 2 * FRAME.len());
    buf.extend_from_slice(FRAME);
    buf.extend_from_slice(word);
    buf.extend_from_slice(FRAME);
    buf
}

/// Whether `haystack` contains the framed status word for `on`.
pub fn contains_status(haystack: &[u8], on: bool) -> bool {
    let needle = status_frame(on);
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Interpret a query response.
///
/// Only the framed `on` word means on. Anything else, including a framed
/// `off`, an empty buffer or line noise, reads as off.
pub fn parse_status(response: &[u8]) -> bool {
    contains_status(response, true)
}
