//! YAML configuration and its merge with command-line flags.
//!
//! ```yaml
//! serial:
//!   path: /dev/ttyACM0
//!   baud_rate: 9600
//!   read_timeout_ms: 10
//! dialect: uniform
//! settle_ms: 50
//! ```
//!
//! `simulate: { relays: 4, gpios: 8 }` may be given instead of `serial`.

use std::path::{Path, PathBuf};

use numato::{Dialect, NumatoError, Port, SerialConfig};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::{Cli, SimSpec};

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`CliConfig`].
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Neither a serial port nor a simulator was configured.
    #[error("no device: pass --serial <PATH>, --simulate <RELAYS,GPIOS,ADCS> or a config file")]
    NoDevice,

    /// The port does not exist on the configured module.
    #[error("no such port: {port} (module has {capacity})")]
    NoSuchPort { port: Port, capacity: usize },

    /// A shell line could not be understood.
    #[error("line {line}: {message}")]
    Shell { line: usize, message: String },

    /// The driver failed.
    #[error(transparent)]
    Numato(#[from] NumatoError),

    /// Reading stdin or writing stdout failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Serial port settings.
    pub serial: Option<SerialConfig>,
    /// Simulated module instead of a serial port.
    pub simulate: Option<SimSpec>,
    /// Command vocabulary.
    pub dialect: Option<Dialect>,
    /// Delay after each switch, in milliseconds.
    pub settle_ms: Option<u64>,
}

impl CliConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Which module to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A module on a serial port.
    Serial(SerialConfig),
    /// An in-memory module.
    Simulated { spec: SimSpec, dialect: Dialect },
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Device to open.
    pub target: Target,
    /// Delay after each switch, in milliseconds.
    pub settle_ms: u64,
}

impl Settings {
    /// Merge the config file (if any) with flags. Flags win.
    pub fn resolve(cli: &Cli, file: CliConfig) -> Result<Self, CliError> {
        let dialect = cli.dialect.or(file.dialect);
        let settle_ms = cli.settle_ms.or(file.settle_ms).unwrap_or(0);

        let target = if let Some(spec) = cli.simulate {
            Target::Simulated {
                spec,
                dialect: dialect.unwrap_or_default(),
            }
        } else if let Some(mut serial) = Settings::serial_config(cli, file.serial) {
            if let Some(baud) = cli.baud {
                serial.baud_rate = baud;
            }
            if let Some(timeout) = cli.timeout_ms {
                serial.read_timeout_ms = timeout;
            }
            if let Some(dialect) = dialect {
                serial.dialect = dialect;
            }
            Target::Serial(serial)
        } else if let Some(spec) = file.simulate {
            Target::Simulated {
                spec,
                dialect: dialect.unwrap_or_default(),
            }
        } else {
            return Err(CliError::NoDevice);
        };

        Ok(Settings { target, settle_ms })
    }

    fn serial_config(cli: &Cli, file: Option<SerialConfig>) -> Option<SerialConfig> {
        match (&cli.serial, file) {
            (Some(path), Some(mut config)) => {
                config.path = path.clone();
                Some(config)
            }
            (Some(path), None) => Some(SerialConfig::new(path.clone())),
            (None, config) => config,
        }
    }
}
