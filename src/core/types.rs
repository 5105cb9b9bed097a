use serde::{Deserialize, Serialize};

/// Predefined registry root key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryRoot {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
    Users,
    CurrentConfig,
}

impl RegistryRoot {
    pub fn name(self) -> &'static str {
        match self {
            RegistryRoot::ClassesRoot => "HKEY_CLASSES_ROOT",
            RegistryRoot::CurrentUser => "HKEY_CURRENT_USER",
            RegistryRoot::LocalMachine => "HKEY_LOCAL_MACHINE",
            RegistryRoot::Users => "HKEY_USERS",
            RegistryRoot::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }
}

/// Processor architecture as reported by GetSystemInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessorArchitecture {
    X86,
    Arm,
    Ia64,
    X64,
    Arm64,
    Unknown(u16),
}

impl ProcessorArchitecture {
    pub fn from_raw(value: u16) -> Self {
        match value {
            0 => ProcessorArchitecture::X86,
            5 => ProcessorArchitecture::Arm,
            6 => ProcessorArchitecture::Ia64,
            9 => ProcessorArchitecture::X64,
            12 => ProcessorArchitecture::Arm64,
            other => ProcessorArchitecture::Unknown(other),
        }
    }
}

/// Processor and memory architecture facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub architecture: ProcessorArchitecture,
    pub page_size: u32,
    pub number_of_processors: u32,
    pub processor_type: u32,
    pub allocation_granularity: u32,
    pub processor_level: u16,
    pub processor_revision: u16,
}

/// Global memory status, all sizes in bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStatus {
    /// Percentage of physical memory in use (0-100)
    pub memory_load: u32,
    pub total_physical: u64,
    pub available_physical: u64,
    pub total_page_file: u64,
    pub available_page_file: u64,
    pub total_virtual: u64,
    pub available_virtual: u64,
}

impl MemoryStatus {
    pub fn used_physical(&self) -> u64 {
        self.total_physical.saturating_sub(self.available_physical)
    }

    pub fn physical_usage_percent(&self) -> f64 {
        if self.total_physical == 0 {
            return 0.0;
        }
        self.used_physical() as f64 / self.total_physical as f64 * 100.0
    }
}

/// Drive classification from GetDriveTypeW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveKind {
    Unknown,
    NoRootDir,
    Removable,
    Fixed,
    Remote,
    CdRom,
    RamDisk,
}

impl DriveKind {
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => DriveKind::NoRootDir,
            2 => DriveKind::Removable,
            3 => DriveKind::Fixed,
            4 => DriveKind::Remote,
            5 => DriveKind::CdRom,
            6 => DriveKind::RamDisk,
            _ => DriveKind::Unknown,
        }
    }
}

/// Free and total space of one volume, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpace {
    /// Free bytes available to the calling user (honors quotas)
    pub free_to_caller: u64,
    pub total: u64,
    pub total_free: u64,
}

impl DiskSpace {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.total_free)
    }

    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used() as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub label: String,
    pub serial_number: u32,
    pub max_component_length: u32,
    pub file_system_flags: u32,
    pub file_system: String,
}

/// One logical drive with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    pub root: String,
    pub kind: DriveKind,
}

/// One network adapter from the IP helper adapter list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    /// Adapter GUID name
    pub name: String,
    pub description: String,
    /// MAC address formatted as `AA-BB-CC-DD-EE-FF`
    pub mac_address: String,
    pub ip_addresses: Vec<String>,
    pub gateways: Vec<String>,
}

impl AdapterInfo {
    /// First assigned IPv4 address, skipping the unassigned `0.0.0.0` entry
    pub fn primary_address(&self) -> Option<&str> {
        self.ip_addresses
            .iter()
            .map(String::as_str)
            .find(|addr| !addr.is_empty() && *addr != "0.0.0.0")
    }

    pub fn primary_gateway(&self) -> Option<&str> {
        self.gateways
            .iter()
            .map(String::as_str)
            .find(|addr| !addr.is_empty() && *addr != "0.0.0.0")
    }
}

/// Format raw hardware address bytes as `AA-BB-CC-DD-EE-FF`
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join("-")
}
