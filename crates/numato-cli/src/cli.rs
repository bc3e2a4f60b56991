//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use numato::{Dialect, Port, State};
use serde::Deserialize;

/// Drive a Numato USB relay/GPIO module, or a simulated one.
#[derive(Parser, Debug)]
#[command(name = "numato", version, about)]
pub struct Cli {
    /// Serial device the module is attached to (e.g. /dev/ttyACM0).
    #[arg(short, long, conflicts_with = "simulate")]
    pub serial: Option<String>,

    /// Run against an in-memory module with this many relays, GPIOs and analog inputs.
    #[arg(long, value_name = "RELAYS,GPIOS,ADCS")]
    pub simulate: Option<SimSpec>,

    /// Serial line speed.
    #[arg(long)]
    pub baud: Option<u32>,

    /// Serial read timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Command vocabulary: `uniform` or `set-clear`.
    #[arg(long)]
    pub dialect: Option<Dialect>,

    /// Delay after each switch before the next command, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// YAML file with device settings. Flags override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

/// What to do with the module.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Turn a port on, e.g. `on relay:0`.
    On {
        /// Port as `<relay|gpio>:<index>`.
        port: Port,
    },
    /// Turn a port off.
    Off {
        /// Port as `<relay|gpio>:<index>`.
        port: Port,
    },
    /// Print whether a port is on.
    Query {
        /// Port as `<relay|gpio>:<index>`.
        port: Port,
    },
    /// Send an explicit state (`on`, `off` or `read`).
    Set {
        /// Port as `<relay|gpio>:<index>`.
        port: Port,
        /// State to send.
        state: State,
    },
    /// Switch every given port on, then off, `count` times.
    Blink {
        /// Ports to blink.
        #[arg(required = true)]
        ports: Vec<Port>,
        /// Number of on/off cycles.
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Toggle one port as fast as possible.
    Hammer {
        /// Port to toggle.
        port: Port,
        /// Number of on/off cycles.
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
    /// Read commands from stdin, one per line (`on relay:0`, `query gpio:1`, ...).
    Shell,
}

impl Action {
    /// Ports this action addresses. Empty for `Shell`.
    pub fn ports(&self) -> &[Port] {
        match self {
            Action::On { port }
            | Action::Off { port }
            | Action::Query { port }
            | Action::Set { port, .. }
            | Action::Hammer { port, .. } => std::slice::from_ref(port),
            Action::Blink { ports, .. } => ports,
            Action::Shell => &[],
        }
    }
}

/// Port counts of a simulated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimSpec {
    /// Number of relays.
    #[serde(default)]
    pub relays: u8,
    /// Number of GPIO pins.
    #[serde(default)]
    pub gpios: u8,
    /// Number of analog inputs.
    #[serde(default)]
    pub adcs: u8,
}

impl FromStr for SimSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let counts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| format!("invalid port count in {:?}: {}", s, e))?;

        match counts[..] {
            [relays, gpios, adcs] => Ok(SimSpec { relays, gpios, adcs }),
            _ => Err(format!("expected RELAYS,GPIOS,ADCS, got {:?}", s)),
        }
    }
}
