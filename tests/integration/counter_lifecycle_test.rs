use hostprobe::core::status::PDH_NO_DATA;
use hostprobe::platform::{Procedure, SimulatedGateway};
use hostprobe::{Collection, CounterSession, ProbeError, Reading, SessionState};

const CPU: &str = "\\Processor(_Total)\\% Processor Time";
const DISK_FREE: &str = "\\LogicalDisk(C:)\\% Free Space";

fn gateway() -> SimulatedGateway {
    SimulatedGateway::new()
        .with_counter(CPU, 23.0)
        .with_counter(DISK_FREE, 42.5)
}

#[test]
fn test_open_attach_collect_read_round_trip() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let cpu = session.attach_counter("cpu", CPU).unwrap();

    assert_eq!(session.collect().unwrap(), Collection::Complete);

    let reading = session.read_double(&cpu);
    let value = reading.value().expect("cpu should be ready");
    assert!(value.is_finite());
    assert_eq!(value, 23.0);
}

#[test]
fn test_disk_free_scenario() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let disk = session.attach_counter("disk-free", DISK_FREE).unwrap();
    session.collect().unwrap();

    assert_eq!(session.read_double(&disk), Reading::Ready(42.5));
    assert_eq!(disk.post_name(), "disk-free");
    assert_eq!(disk.counter_path(), DISK_FREE);
}

#[test]
fn test_malformed_path_scenario() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();

    let err = session.attach_counter("bad", "no-leading-separator").unwrap_err();
    match err {
        ProbeError::CounterAttach {
            counter_path,
            status,
        } => {
            assert_eq!(counter_path, "no-leading-separator");
            assert!(!status.is_success());
        }
        other => panic!("expected CounterAttach, got {other}"),
    }
    // the session stays usable
    assert!(session.attach_counter("cpu", CPU).is_ok());
}

#[test]
fn test_read_before_any_collect_is_pending_never_fatal() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let counters = vec![
        session.attach_counter("cpu", CPU).unwrap(),
        session.attach_counter("disk", DISK_FREE).unwrap(),
    ];

    for counter in &counters {
        let reading = session.read_double(counter);
        assert_eq!(reading, Reading::Pending);
        assert!(!reading.is_fault());
    }
}

#[test]
fn test_close_then_read_scenario() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let cpu = session.attach_counter("cpu", CPU).unwrap();
    session.collect().unwrap();
    assert!(session.read_double(&cpu).is_ready());

    session.close().unwrap();

    assert_eq!(session.read_double(&cpu), Reading::Invalid);
    // the subsystem agrees: the handle died with its query
    assert_eq!(session.reader().read_double(&cpu), Reading::Invalid);
}

#[test]
fn test_repeated_close_releases_once() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    session.attach_counter("cpu", CPU).unwrap();

    for _ in 0..5 {
        session.close().unwrap();
    }
    drop(session);

    let closes = gw
        .calls()
        .iter()
        .filter(|call| **call == Procedure::PdhCloseQuery)
        .count();
    assert_eq!(closes, 1);
    assert_eq!(gw.open_query_count(), 0);
    assert_eq!(gw.live_counter_count(), 0);
}

#[test]
fn test_attach_after_close_is_rejected() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    session.close().unwrap();

    let err = session.attach_counter("cpu", CPU).unwrap_err();
    assert!(matches!(
        err,
        ProbeError::InvalidState {
            state: SessionState::Closed,
            ..
        }
    ));
    assert!(err.to_string().contains("closed"));
}

#[test]
fn test_collect_after_close_is_rejected() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    session.attach_counter("cpu", CPU).unwrap();
    session.close().unwrap();

    assert!(matches!(
        session.collect(),
        Err(ProbeError::InvalidState { .. })
    ));
}

#[test]
fn test_first_collect_without_data_then_recovers() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let cpu = session.attach_counter("cpu", CPU).unwrap();

    gw.script_collect_failure(PDH_NO_DATA);
    assert_eq!(session.collect().unwrap(), Collection::NoDataYet);
    assert_eq!(session.read_double(&cpu), Reading::Pending);

    gw.clear_scripts();
    assert_eq!(session.collect().unwrap(), Collection::Complete);
    assert_eq!(session.read_double(&cpu), Reading::Ready(23.0));
}

#[test]
fn test_independent_sessions() {
    let gw = gateway();
    let mut first = CounterSession::start(&gw).unwrap();
    let mut second = CounterSession::start(&gw).unwrap();
    let cpu = first.attach_counter("cpu", CPU).unwrap();
    let disk = second.attach_counter("disk", DISK_FREE).unwrap();

    first.collect().unwrap();
    second.collect().unwrap();
    second.close().unwrap();

    assert_eq!(first.read_double(&cpu), Reading::Ready(23.0));
    assert_eq!(second.read_double(&disk), Reading::Invalid);
    assert_eq!(gw.open_query_count(), 1);
}

#[test]
fn test_values_refresh_between_passes() {
    let gw = gateway();
    let mut session = CounterSession::start(&gw).unwrap();
    let cpu = session.attach_counter("cpu", CPU).unwrap();

    session.collect().unwrap();
    assert_eq!(session.read_double(&cpu), Reading::Ready(23.0));

    gw.set_value(CPU, 71.25);
    session.collect().unwrap();
    assert_eq!(session.read_double(&cpu), Reading::Ready(71.25));
}
