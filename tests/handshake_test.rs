mod common;

use common::Recorder;
use rusty_rate::connection::delay_rate::DelayRateConnection;
use rusty_rate::connection::diffusion::DiffusionConnection;
use rusty_rate::connection::rate_instantaneous::RateConnectionInstantaneous;
use rusty_rate::connection::{CommonProperties, Connection};
use rusty_rate::error::SynapseError;
use rusty_rate::event::{EventKind, EventKindSet};
use rusty_rate::node::Capabilities;

fn check_unsupported_source<C: Connection>() {
    let cp = CommonProperties::default();
    let silent = Recorder::new(0, Capabilities::new());
    for num_receptors in 0..3 {
        let target = Recorder::universal(1, num_receptors);
        let mut connection = C::default();
        assert_eq!(
            connection.check_connection(&silent, &target, 0, &cp),
            Err(SynapseError::UnsupportedEventKind {
                model: "recorder".to_string(),
                kind: C::MODEL.event_kind()
            })
        );
        assert_eq!(connection.target(0), Err(SynapseError::NotConnected));
        assert_eq!(connection, C::default());
    }
}

fn check_unknown_receptor<C: Connection>() {
    let cp = CommonProperties::default();
    let source = Recorder::universal(0, 0);
    let target = Recorder::universal(1, 2);
    let mut connection = C::default();
    assert_eq!(
        connection.check_connection(&source, &target, 2, &cp),
        Err(SynapseError::UnknownReceptorType {
            model: "recorder".to_string(),
            receptor: 2
        })
    );
    assert_eq!(connection, C::default());
}

#[test]
fn test_source_must_send_event_kind() {
    check_unsupported_source::<DelayRateConnection>();
    check_unsupported_source::<RateConnectionInstantaneous>();
    check_unsupported_source::<DiffusionConnection>();
}

#[test]
fn test_target_must_have_receptor() {
    check_unknown_receptor::<DelayRateConnection>();
    check_unknown_receptor::<RateConnectionInstantaneous>();
    check_unknown_receptor::<DiffusionConnection>();
}

#[test]
fn test_source_sending_other_kinds() {
    let cp = CommonProperties::default();
    let rate_only = Recorder::new(
        0,
        Capabilities::new()
            .emitting(EventKind::DelayedRate)
            .emitting(EventKind::InstantaneousRate),
    );
    let target = Recorder::universal(1, 1);

    let mut connection = DiffusionConnection::default();
    assert!(matches!(
        connection.check_connection(&rate_only, &target, 0, &cp),
        Err(SynapseError::UnsupportedEventKind {
            kind: EventKind::Diffusion,
            ..
        })
    ));

    let mut connection = DelayRateConnection::default();
    assert_eq!(connection.check_connection(&rate_only, &target, 0, &cp), Ok(()));
}

#[test]
fn test_receptor_must_handle_event_kind() {
    let cp = CommonProperties::default();
    let source = Recorder::universal(0, 0);
    let target = Recorder::new(
        1,
        Capabilities::new()
            .with_receptor(EventKindSet::of(&[EventKind::Diffusion]))
            .with_receptor(EventKindSet::of(&[EventKind::DelayedRate])),
    );

    let mut connection = DelayRateConnection::default();
    assert_eq!(
        connection.check_connection(&source, &target, 0, &cp),
        Err(SynapseError::IncompatibleEventKind {
            model: "recorder".to_string(),
            kind: EventKind::DelayedRate,
            receptor: 0
        })
    );
    assert_eq!(connection.check_connection(&source, &target, 1, &cp), Ok(()));
    assert_eq!(connection.rport(), 1);
    assert_eq!(connection.target(0), Ok(1));

    let mut connection = DiffusionConnection::default();
    assert_eq!(connection.check_connection(&source, &target, 0, &cp), Ok(()));
    assert_eq!(connection.rport(), 0);
}

#[test]
fn test_handshake_runs_once() {
    let cp = CommonProperties::default();
    let source = Recorder::universal(0, 0);
    let target = Recorder::universal(1, 3);
    let other = Recorder::universal(2, 3);

    let mut connection = RateConnectionInstantaneous::default();
    connection.check_connection(&source, &target, 2, &cp).unwrap();
    assert_eq!(
        connection.check_connection(&source, &other, 0, &cp),
        Err(SynapseError::AlreadyConnected)
    );
    assert_eq!(connection.target(0), Ok(1));
    assert_eq!(connection.rport(), 2);
}
