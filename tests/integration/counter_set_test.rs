use hostprobe::core::status::PDH_INVALID_HANDLE;
use hostprobe::platform::SimulatedGateway;
use hostprobe::{CounterCatalog, CounterSet, ProbeError, Reading};

fn catalog() -> CounterCatalog {
    CounterCatalog::empty()
        .with_counter("cpu", "\\Processor(_Total)\\% Processor Time")
        .with_counter("mem", "\\Memory\\Available MBytes")
}

fn gateway() -> SimulatedGateway {
    SimulatedGateway::new()
        .with_rate_counter("\\Processor(_Total)\\% Processor Time", 12.0)
        .with_counter("\\Memory\\Available MBytes", 4096.0)
}

#[test]
fn test_samples_follow_catalog_order() {
    let gw = gateway();
    let mut set = CounterSet::open(&gw, &catalog()).unwrap();

    set.sample().unwrap();
    let samples = set.sample().unwrap();
    let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["cpu", "mem"]);
    assert_eq!(samples[0].reading, Reading::Ready(12.0));
    assert_eq!(samples[1].reading, Reading::Ready(4096.0));
}

#[test]
fn test_unknown_counter_fails_open() {
    let gw = SimulatedGateway::new().with_counter("\\Memory\\Available MBytes", 1.0);
    let err = CounterSet::open(&gw, &catalog()).err().unwrap();
    assert!(matches!(err, ProbeError::CounterAttach { .. }));
    // the half-built session was released
    assert_eq!(gw.open_query_count(), 0);
}

#[test]
fn test_stale_counter_is_reported_per_sample() {
    let gw = gateway();
    let mut set = CounterSet::open(&gw, &catalog()).unwrap();
    set.sample().unwrap();

    gw.script_read_status("\\Memory\\Available MBytes", PDH_INVALID_HANDLE);
    let samples = set.sample().unwrap();
    assert_eq!(samples[1].reading, Reading::Invalid);
    assert!(samples[0].reading.is_ready());
}

#[test]
fn test_sample_after_close_fails() {
    let gw = gateway();
    let mut set = CounterSet::open(&gw, &catalog()).unwrap();
    set.close().unwrap();
    assert!(set.sample().is_err());
}
