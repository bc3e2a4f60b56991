//! Executing actions against an open module.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use clap::Parser;
use numato::{Numato, Port, PortClass, Transport};
use tracing::{debug, info, warn};

use crate::cli::Action;
use crate::config::CliError;

/// One line of shell input, parsed with the same grammar as the subcommands.
#[derive(Parser, Debug)]
#[command(name = "", no_binary_name = true, disable_help_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    action: Action,
}

/// Number of ports of a class on the connected module.
pub type Capacity<'a> = Box<dyn Fn(PortClass) -> usize + 'a>;

/// A module plus the output stream results are printed to.
pub struct Session<'a, T: Transport, W: Write> {
    numato: &'a mut Numato<T>,
    settle: Duration,
    out: W,
    capacity: Option<Capacity<'a>>,
}

impl<'a, T: Transport, W: Write> Session<'a, T, W> {
    /// Start a session. `settle` is slept after every switch.
    pub fn new(numato: &'a mut Numato<T>, settle: Duration, out: W) -> Self {
        Session {
            numato,
            settle,
            out,
            capacity: None,
        }
    }

    /// Reject actions on ports the module does not have before sending them.
    ///
    /// Only a simulated module knows its size; real hardware ignores commands
    /// for missing ports.
    pub fn with_capacity(mut self, capacity: Capacity<'a>) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Run one action. `Shell` reads further actions from `input`.
    pub fn apply(&mut self, action: &Action, input: &mut dyn BufRead) -> Result<(), CliError> {
        self.check_ports(action)?;
        match action {
            Action::On { port } => self.switch(*port, true),
            Action::Off { port } => self.switch(*port, false),
            Action::Query { port } => self.query(*port),
            Action::Set { port, state } => {
                self.numato.set(*port, *state)?;
                self.settle();
                Ok(())
            }
            Action::Blink { ports, count } => {
                info!("Blinking {} port(s) {} times", ports.len(), count);
                for _ in 0..*count {
                    for &port in ports {
                        self.switch(port, true)?;
                    }
                    for &port in ports {
                        self.switch(port, false)?;
                    }
                }
                Ok(())
            }
            Action::Hammer { port, count } => {
                info!("Hammering {} {} times", port, count);
                for _ in 0..*count {
                    self.switch(*port, true)?;
                    self.switch(*port, false)?;
                }
                Ok(())
            }
            Action::Shell => self.shell(input),
        }
    }

    /// Read actions line by line until end of input or `quit`.
    ///
    /// Lines that do not parse are reported and skipped; driver errors end
    /// the session.
    pub fn shell(&mut self, input: &mut dyn BufRead) -> Result<(), CliError> {
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            line_no += 1;

            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text == "quit" || text == "exit" {
                return Ok(());
            }

            let parsed = match ShellLine::try_parse_from(text.split_whitespace()) {
                Ok(ShellLine { action: Action::Shell }) => Err("already in a shell".to_string()),
                Ok(parsed) => match self.check_ports(&parsed.action) {
                    Ok(()) => Ok(parsed.action),
                    Err(e) => Err(e.to_string()),
                },
                Err(e) => Err(e
                    .to_string()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string()),
            };
            match parsed {
                Ok(action) => self.apply(&action, input)?,
                Err(message) => {
                    let err = CliError::Shell {
                        line: line_no,
                        message: format!("{:?}: {}", text, message),
                    };
                    warn!("{}", err);
                    writeln!(self.out, "error: {}", err)?;
                }
            }
        }
    }

    fn check_ports(&self, action: &Action) -> Result<(), CliError> {
        let Some(limit) = &self.capacity else {
            return Ok(());
        };
        for &port in action.ports() {
            let capacity = limit(port.class);
            if port.number >= capacity {
                return Err(CliError::NoSuchPort { port, capacity });
            }
        }
        Ok(())
    }

    fn switch(&mut self, port: Port, on: bool) -> Result<(), CliError> {
        if on {
            self.numato.on(port)?;
        } else {
            self.numato.off(port)?;
        }
        self.settle();
        Ok(())
    }

    fn query(&mut self, port: Port) -> Result<(), CliError> {
        let on = self.numato.query(port)?;
        writeln!(self.out, "{}: {}", port, if on { "on" } else { "off" })?;
        Ok(())
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            debug!("Settling for {:?}", self.settle);
            thread::sleep(self.settle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numato::SharedSimulator;

    fn run(sim: &SharedSimulator, action: Action, input: &str) -> String {
        let mut numato = Numato::new(sim.clone());
        let mut out = Vec::new();
        let mut input = input.as_bytes();
        let limits = sim.clone();
        Session::new(&mut numato, Duration::ZERO, &mut out)
            .with_capacity(Box::new(move |class| limits.capacity(class)))
            .apply(&action, &mut input)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_on_then_query() {
        let sim = SharedSimulator::new(2, 0, 0);
        assert_eq!(run(&sim, Action::On { port: Port::relay(1) }, ""), "");
        assert!(sim.is_on(Port::relay(1)));
        assert_eq!(run(&sim, Action::Query { port: Port::relay(1) }, ""), "relay 1: on\n");
        assert_eq!(run(&sim, Action::Query { port: Port::relay(0) }, ""), "relay 0: off\n");
    }

    #[test]
    fn test_blink_leaves_ports_off() {
        let sim = SharedSimulator::new(0, 3, 0);
        let ports = vec![Port::gpio(0), Port::gpio(2)];
        run(&sim, Action::Blink { ports, count: 3 }, "");
        assert!(!sim.is_on(Port::gpio(0)));
        assert!(!sim.is_on(Port::gpio(2)));
    }

    #[test]
    fn test_shell_script() {
        let sim = SharedSimulator::new(2, 2, 0);
        let script = "# setup\non relay:0\n\non gpio:1\n\
                      query relay:0\nquery gpio:0\n\
                      off relay:0\nquery relay:0\n\
                      quit\non relay:1\n";
        let out = run(&sim, Action::Shell, script);
        assert_eq!(out, "relay 0: on\ngpio 0: off\nrelay 0: off\n");
        assert!(sim.is_on(Port::gpio(1)));
        assert!(!sim.is_on(Port::relay(1)));
    }

    #[test]
    fn test_shell_reports_bad_lines_and_continues() {
        let sim = SharedSimulator::new(1, 0, 0);
        let out = run(&sim, Action::Shell, "toggle relay:0\nshell\non relay:0\n");
        assert!(out.contains("line 1"));
        assert!(out.contains("line 2"));
        assert!(sim.is_on(Port::relay(0)));
    }

    #[test]
    fn test_shell_reports_missing_port_and_continues() {
        let sim = SharedSimulator::new(2, 0, 0);
        let out = run(&sim, Action::Shell, "on relay:9
blink relay:0 gpio:0
on relay:1
");
        assert!(out.contains("error: line 1"));
        assert!(out.contains("no such port: relay 9"));
        assert!(out.contains("error: line 2"));
        assert!(sim.is_on(Port::relay(1)));
        assert!(!sim.is_on(Port::relay(0)));
    }

    #[test]
    fn test_missing_port_fails_single_action() {
        let sim = SharedSimulator::new(1, 0, 0);
        let mut numato = Numato::new(sim.clone());
        let limits = sim.clone();
        let res = Session::new(&mut numato, Duration::ZERO, Vec::new())
            .with_capacity(Box::new(move |class| limits.capacity(class)))
            .apply(&Action::Query { port: Port::relay(1) }, &mut "".as_bytes());
        assert!(matches!(res, Err(CliError::NoSuchPort { capacity: 1, .. })));
        assert_eq!(sim.buffered_len(), 0);
    }
}
