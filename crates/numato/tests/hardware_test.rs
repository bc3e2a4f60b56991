//! Tests against a real module.
//!
//! Set `NUMATO_SERIAL` to the device path (e.g. `/dev/ttyACM0`) to run them;
//! otherwise they are skipped. They share one device, so they run serially.

use std::thread;
use std::time::Duration;

use numato::{Numato, Port, SerialTransport};
use serial_test::serial;

/// Time the relays need to settle before a read reflects a switch.
const SETTLE: Duration = Duration::from_millis(50);

fn open_device() -> Option<Numato<SerialTransport>> {
    let path = match std::env::var("NUMATO_SERIAL") {
        Ok(path) if !path.is_empty() => path,
        _ => {
            eprintln!("Skipping test: NUMATO_SERIAL not set");
            return None;
        }
    };
    Some(Numato::open(&path).expect("open serial port"))
}

#[test]
#[serial]
fn test_hardware_relays() {
    let Some(mut n) = open_device() else {
        return;
    };
    let ports: Vec<Port> = (0..4).map(Port::relay).collect();

    for &port in &ports {
        n.on(port).expect("turning port on");
        thread::sleep(SETTLE);
        assert!(n.query(port).expect("reading port status"), "{} not on", port);
    }

    for &port in &ports {
        n.off(port).expect("turning port off");
        thread::sleep(SETTLE);
        assert!(!n.query(port).expect("reading port status"), "{} not off", port);
    }

    n.close().unwrap();
}

#[test]
#[serial]
fn test_hardware_gpio_blink() {
    let Some(mut n) = open_device() else {
        return;
    };
    let ports: Vec<Port> = (0..6).map(Port::gpio).collect();

    for _ in 0..10 {
        for &port in &ports {
            n.on(port).expect("turning port on");
        }
        for &port in &ports {
            n.off(port).expect("turning port off");
        }
    }

    n.close().unwrap();
}

#[test]
#[serial]
fn test_hardware_hammer() {
    let Some(mut n) = open_device() else {
        return;
    };
    let port = Port::relay(3);

    for _ in 0..50 {
        n.on(port).expect("turning port on");
        n.off(port).expect("turning port off");
    }

    n.close().unwrap();
}
