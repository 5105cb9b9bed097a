use hostprobe::platform::SimulatedGateway;
use hostprobe::{ProbeError, RegistryAccessor, RegistryRoot, StatusCode};

const KEY: &str = "SYSTEM\\CurrentControlSet\\Control\\ComputerName\\ComputerName";

#[test]
fn test_lookup_is_case_insensitive() {
    let gw = SimulatedGateway::new().with_registry_string(
        RegistryRoot::LocalMachine,
        KEY,
        "ComputerName",
        "BUILD-01",
    );
    let registry = RegistryAccessor::new(&gw);

    let name = registry
        .get_string(RegistryRoot::LocalMachine, &KEY.to_uppercase(), "computername")
        .unwrap();
    assert_eq!(name, "BUILD-01");
}

#[test]
fn test_roots_are_distinct() {
    let gw = SimulatedGateway::new().with_registry_u32(RegistryRoot::CurrentUser, KEY, "Flag", 1);
    let registry = RegistryAccessor::new(&gw);

    assert_eq!(
        registry.get_u32(RegistryRoot::CurrentUser, KEY, "Flag").unwrap(),
        1
    );
    let err = registry
        .get_u32(RegistryRoot::LocalMachine, KEY, "Flag")
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FileNotFound));
    assert!(matches!(err, ProbeError::RegistryNotFound { .. }));
}

#[test]
fn test_empty_value_differs_from_missing() {
    let gw = SimulatedGateway::new().with_registry_string(RegistryRoot::LocalMachine, KEY, "Empty", "");
    let registry = RegistryAccessor::new(&gw);

    assert_eq!(
        registry
            .find_string(RegistryRoot::LocalMachine, KEY, "Empty")
            .unwrap(),
        Some(String::new())
    );
    assert_eq!(
        registry
            .find_string(RegistryRoot::LocalMachine, KEY, "Missing")
            .unwrap(),
        None
    );
}
