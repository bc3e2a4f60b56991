//! `numato` command-line tool.
//!
//! ```text
//! numato --serial /dev/ttyACM0 on relay:0
//! numato --serial /dev/ttyACM0 query relay:0
//! numato --simulate 4,8,0 shell < script.txt
//! ```

mod cli;
mod config;
mod session;

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use numato::{Numato, SharedSimulator, Transport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Action, Cli};
use crate::config::{CliConfig, CliError, Settings, Target};
use crate::session::{Capacity, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let file = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let settings = Settings::resolve(cli, file)?;
    let settle = Duration::from_millis(settings.settle_ms);

    match settings.target {
        Target::Serial(config) => {
            info!("Opening {} at {} baud", config.path, config.baud_rate);
            let numato = Numato::open_with(&config)?;
            drive(numato, &cli.action, settle, None)
        }
        Target::Simulated { spec, dialect } => {
            info!(
                "Simulating {} relays, {} GPIOs, {} analog inputs",
                spec.relays, spec.gpios, spec.adcs
            );
            let sim = SharedSimulator::with_dialect(spec.relays, spec.gpios, spec.adcs, dialect);
            let numato = Numato::with_dialect(sim.clone(), dialect);
            let capacity: Capacity<'static> = Box::new(move |class| sim.capacity(class));
            drive(numato, &cli.action, settle, Some(capacity))
        }
    }
}

fn drive<T: Transport>(
    mut numato: Numato<T>,
    action: &Action,
    settle: Duration,
    capacity: Option<Capacity<'static>>,
) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();

    {
        let mut session = Session::new(&mut numato, settle, stdout.lock());
        if let Some(capacity) = capacity {
            session = session.with_capacity(capacity);
        }
        session.apply(action, &mut input)?;
    }
    numato.close()?;
    Ok(())
}
