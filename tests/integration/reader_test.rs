use hostprobe::core::status::{PDH_INVALID_DATA, PDH_INVALID_HANDLE, PDH_NO_DATA};
use hostprobe::platform::SimulatedGateway;
use hostprobe::{CounterSession, CounterValueReader, Reading, StatusCode};

const PATH: &str = "\\PhysicalDisk(_Total)\\% Disk Time";

#[test]
fn test_pending_statuses_are_merged() {
    let gw = SimulatedGateway::new().with_counter(PATH, 5.0);
    let mut session = CounterSession::start(&gw).unwrap();
    let disk = session.attach_counter("disk", PATH).unwrap();
    session.collect().unwrap();
    let reader = CounterValueReader::new(&gw);

    for status in [PDH_NO_DATA, PDH_INVALID_DATA] {
        gw.script_read_status(PATH, status);
        assert_eq!(reader.read_double(&disk), Reading::Pending);
    }
}

#[test]
fn test_invalid_handle_is_not_retryable() {
    let gw = SimulatedGateway::new().with_counter(PATH, 5.0);
    let mut session = CounterSession::start(&gw).unwrap();
    let disk = session.attach_counter("disk", PATH).unwrap();
    session.collect().unwrap();

    gw.script_read_status(PATH, PDH_INVALID_HANDLE);
    let reading = session.read_double(&disk);
    assert_eq!(reading, Reading::Invalid);
    assert!(reading.is_fault());
    assert!(!reading.is_pending());
}

#[test]
fn test_unclassified_code_is_preserved() {
    let gw = SimulatedGateway::new().with_counter(PATH, 5.0);
    let mut session = CounterSession::start(&gw).unwrap();
    let disk = session.attach_counter("disk", PATH).unwrap();
    session.collect().unwrap();

    gw.script_read_status(PATH, 0xC000_0BC4);
    match session.read_double(&disk) {
        Reading::Fatal(code) => {
            assert_eq!(code, 0xC000_0BC4);
            assert_eq!(StatusCode::from_raw(code), StatusCode::Other(0xC000_0BC4));
        }
        other => panic!("expected Fatal, got {:?}", other),
    }
}
