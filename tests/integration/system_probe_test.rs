use hostprobe::platform::simulated::SimulatedDrive;
use hostprobe::platform::SimulatedGateway;
use hostprobe::{AdapterInfo, DriveKind, MemoryStatus, ProbeError, SystemProbe};
use std::path::PathBuf;

fn gateway() -> SimulatedGateway {
    SimulatedGateway::new()
        .with_drive(SimulatedDrive::fixed("C:\\", 40, 100).with_label("System"))
        .with_drive(SimulatedDrive::new("D:\\", 5))
        .with_drive(SimulatedDrive::new("F:\\", 2))
        .with_adapter(AdapterInfo {
            name: "{4D36E972-E325-11CE-BFC1-08002BE10318}".to_string(),
            description: "Intel(R) Ethernet Connection".to_string(),
            mac_address: "00-1A-2B-3C-4D-5E".to_string(),
            ip_addresses: vec!["192.168.1.20".to_string()],
            gateways: vec!["192.168.1.1".to_string()],
        })
        .with_executable("C:\\agent\\agent.exe")
}

#[test]
fn test_memory_status() {
    let gw = SimulatedGateway::new().with_memory(MemoryStatus {
        memory_load: 25,
        total_physical: 8u64 << 30,
        available_physical: 6u64 << 30,
        ..Default::default()
    });
    let memory = SystemProbe::new(&gw).memory_status().unwrap();
    assert_eq!(memory.memory_load, 25);
    assert_eq!(memory.used_physical(), 2u64 << 30);
}

#[test]
fn test_drive_enumeration_and_classification() {
    let gw = gateway();
    let probe = SystemProbe::new(&gw);

    let drives = probe.drives().unwrap();
    let kinds: Vec<DriveKind> = drives.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DriveKind::Fixed, DriveKind::CdRom, DriveKind::Removable]
    );
    assert_eq!(probe.fixed_drives().unwrap(), vec!["C:\\".to_string()]);
}

#[test]
fn test_volume_info() {
    let gw = gateway();
    let probe = SystemProbe::new(&gw);

    let volume = probe.volume_info("c:\\").unwrap();
    assert_eq!(volume.label, "System");
    assert_eq!(volume.file_system, "NTFS");

    // no media in the optical drive
    assert!(matches!(
        probe.volume_info("D:\\"),
        Err(ProbeError::Native { code: 21, .. })
    ));
}

#[test]
fn test_network_adapters() {
    let gw = gateway();
    let adapters = SystemProbe::new(&gw).network_adapters().unwrap();
    assert_eq!(adapters.len(), 1);
    assert_eq!(adapters[0].primary_address(), Some("192.168.1.20"));
    assert_eq!(adapters[0].primary_gateway(), Some("192.168.1.1"));
}

#[test]
fn test_no_adapters_is_an_error() {
    let gw = SimulatedGateway::new();
    assert!(SystemProbe::new(&gw).network_adapters().is_err());
}

#[test]
fn test_executable_path() {
    let gw = gateway();
    assert_eq!(
        SystemProbe::new(&gw).executable_path().unwrap(),
        PathBuf::from("C:\\agent\\agent.exe")
    );
}

#[test]
fn test_processor_info() {
    let gw = gateway();
    let info = SystemProbe::new(&gw).processor_info();
    assert!(info.number_of_processors > 0);
    assert_eq!(info.page_size, 4096);
}
