//! Client against the simulator: the same code path used for hardware.

use numato::{Dialect, Numato, Port, SharedSimulator, State};

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_simulator_scenario() {
    let (sim, mut dummy) = Numato::open_simulator(1, 1, 0);
    let p = Port::relay(0);

    sim.set(p, State::On);
    assert!(dummy.query(p).unwrap());
    assert!(dummy.query(p).unwrap());
    assert!(sim.is_on(p));

    dummy.off(p).unwrap();
    assert!(!sim.is_on(p));
    assert!(!dummy.query(p).unwrap());
    assert!(!dummy.query(p).unwrap());

    dummy.close().unwrap();
}

#[test]
fn test_round_trip_every_port() {
    let (sim, mut n) = Numato::open_simulator(4, 6, 0);
    let ports: Vec<Port> = (0..4).map(Port::relay).chain((0..6).map(Port::gpio)).collect();

    for state in [State::On, State::Off] {
        for &port in &ports {
            n.set(port, state).unwrap();
            let expected = state == State::On;
            assert_eq!(n.query(port).unwrap(), expected, "client view of {}", port);
            assert_eq!(sim.is_on(port), expected, "simulator view of {}", port);
        }
    }
}

#[test]
fn test_query_after_many_unread_commands() {
    // Echoes from earlier commands pile up unread; the query must still see
    // its own answer.
    let (_sim, mut n) = Numato::open_simulator(8, 0, 0);
    for i in 0..8 {
        n.on(Port::relay(i)).unwrap();
    }
    n.off(Port::relay(5)).unwrap();
    assert!(!n.query(Port::relay(5)).unwrap());
    assert!(n.query(Port::relay(4)).unwrap());
}

#[test]
fn test_query_after_long_unread_burst() {
    // Several kilobytes of echo and prompts, far more than one read buffer.
    let (sim, mut n) = Numato::open_simulator(1, 0, 0);
    let p = Port::relay(0);
    for _ in 0..100 {
        n.on(p).unwrap();
        n.off(p).unwrap();
    }
    n.on(p).unwrap();
    assert!(sim.buffered_len() > 4096);

    assert!(sim.is_on(p));
    assert!(n.query(p).unwrap());
    assert_eq!(sim.buffered_len(), 0);

    for _ in 0..150 {
        n.off(p).unwrap();
    }
    assert!(!n.query(p).unwrap());
}

#[test]
fn test_large_index_response_fits() {
    let (_sim, mut n) = Numato::open_simulator(200, 0, 0);
    n.on(Port::relay(199)).unwrap();
    assert!(n.query(Port::relay(199)).unwrap());
}

// ============================================================================
// State semantics
// ============================================================================

#[test]
fn test_repeated_on_off_is_idempotent() {
    let (_sim, mut n) = Numato::open_simulator(1, 0, 0);
    let p = Port::relay(0);
    for _ in 0..3 {
        n.on(p).unwrap();
        assert!(n.query(p).unwrap());
    }
    for _ in 0..3 {
        n.off(p).unwrap();
        assert!(!n.query(p).unwrap());
    }
}

#[test]
fn test_isolation() {
    let (sim, mut n) = Numato::open_simulator(2, 2, 0);
    n.on(Port::relay(0)).unwrap();
    assert!(!n.query(Port::gpio(0)).unwrap());
    assert!(!n.query(Port::relay(1)).unwrap());
    assert!(!sim.is_on(Port::gpio(0)));
    assert!(!sim.is_on(Port::relay(1)));
}

#[test]
fn test_set_read_is_answered_but_changes_nothing() {
    let (sim, mut n) = Numato::open_simulator(1, 0, 0);
    sim.on(Port::relay(0));
    n.set(Port::relay(0), State::Read).unwrap();
    assert!(sim.is_on(Port::relay(0)));
    assert!(sim.buffered_len() > 0);
}

#[test]
fn test_set_clear_dialect_round_trip() {
    let sim = SharedSimulator::with_dialect(0, 2, 0, Dialect::SetClear);
    let mut n = Numato::with_dialect(sim.clone(), Dialect::SetClear);

    n.on(Port::gpio(1)).unwrap();
    assert!(sim.is_on(Port::gpio(1)));
    assert!(n.query(Port::gpio(1)).unwrap());

    n.off(Port::gpio(1)).unwrap();
    assert!(!n.query(Port::gpio(1)).unwrap());
}

#[test]
fn test_mismatched_dialect_is_not_understood() {
    let sim = SharedSimulator::new(0, 1, 0);
    let mut n = Numato::with_dialect(sim.clone(), Dialect::SetClear);
    n.on(Port::gpio(0)).unwrap();
    assert!(!sim.is_on(Port::gpio(0)));
}

#[test]
#[should_panic(expected = "port out of range")]
fn test_out_of_range_port_is_fatal() {
    let (_sim, mut n) = Numato::open_simulator(1, 0, 0);
    let _ = n.on(Port::relay(1));
}
