//! Native call gateway.
//!
//! Every native entry point hostprobe uses is named by a [`Procedure`] and
//! reached through one of the surface traits below. A gateway call never
//! interprets a non-zero status: it hands the raw code (plus the thread's last
//! error where the return value carries no detail) back as a
//! [`NativeFailure`] and the calling component classifies it.

use std::fmt;

use crate::core::types::{
    AdapterInfo, DiskSpace, MemoryStatus, ProcessorInfo, RegistryRoot, VolumeInfo,
};
use crate::error::ProbeError;

/// Native library exporting a [`Procedure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    Advapi32,
    Kernel32,
    Pdh,
    IpHlpApi,
}

impl Library {
    pub fn file_name(self) -> &'static str {
        match self {
            Library::Advapi32 => "advapi32.dll",
            Library::Kernel32 => "kernel32.dll",
            Library::Pdh => "pdh.dll",
            Library::IpHlpApi => "iphlpapi.dll",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    RegGetValue,
    GetSystemInfo,
    GetTickCount64,
    GlobalMemoryStatusEx,
    GetLogicalDriveStrings,
    GetDriveType,
    GetDiskFreeSpaceEx,
    GetVolumeInformation,
    QueryDosDevice,
    GetModuleFileName,
    GetAdaptersInfo,
    PdhOpenQuery,
    PdhAddCounter,
    PdhCollectQueryData,
    PdhGetFormattedCounterValue,
    PdhCloseQuery,
}

impl Procedure {
    /// Exported symbol name
    pub fn name(self) -> &'static str {
        match self {
            Procedure::RegGetValue => "RegGetValueW",
            Procedure::GetSystemInfo => "GetSystemInfo",
            Procedure::GetTickCount64 => "GetTickCount64",
            Procedure::GlobalMemoryStatusEx => "GlobalMemoryStatusEx",
            Procedure::GetLogicalDriveStrings => "GetLogicalDriveStringsW",
            Procedure::GetDriveType => "GetDriveTypeW",
            Procedure::GetDiskFreeSpaceEx => "GetDiskFreeSpaceExW",
            Procedure::GetVolumeInformation => "GetVolumeInformationW",
            Procedure::QueryDosDevice => "QueryDosDeviceW",
            Procedure::GetModuleFileName => "GetModuleFileNameW",
            Procedure::GetAdaptersInfo => "GetAdaptersInfo",
            Procedure::PdhOpenQuery => "PdhOpenQueryW",
            Procedure::PdhAddCounter => "PdhAddCounterW",
            Procedure::PdhCollectQueryData => "PdhCollectQueryData",
            Procedure::PdhGetFormattedCounterValue => "PdhGetFormattedCounterValue",
            Procedure::PdhCloseQuery => "PdhCloseQuery",
        }
    }

    pub fn library(self) -> Library {
        match self {
            Procedure::RegGetValue => Library::Advapi32,
            Procedure::GetAdaptersInfo => Library::IpHlpApi,
            Procedure::PdhOpenQuery
            | Procedure::PdhAddCounter
            | Procedure::PdhCollectQueryData
            | Procedure::PdhGetFormattedCounterValue
            | Procedure::PdhCloseQuery => Library::Pdh,
            _ => Library::Kernel32,
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.library().file_name(), self.name())
    }
}

/// Raw non-success outcome of one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFailure {
    pub procedure: Procedure,
    pub status: u32,
    pub last_error: Option<u32>,
}

impl NativeFailure {
    pub fn new(procedure: Procedure, status: u32) -> Self {
        Self {
            procedure,
            status,
            last_error: None,
        }
    }

    /// Failure of a call whose return value only signals "failed"
    pub fn with_last_error(procedure: Procedure, last_error: u32) -> Self {
        Self {
            procedure,
            status: last_error,
            last_error: Some(last_error),
        }
    }

    /// Most specific code available: the last error if captured, else the status
    pub fn code(&self) -> u32 {
        self.last_error.unwrap_or(self.status)
    }
}

impl From<NativeFailure> for ProbeError {
    fn from(failure: NativeFailure) -> Self {
        ProbeError::native(failure.procedure.name(), failure.code())
    }
}

pub type NativeResult<T> = std::result::Result<T, NativeFailure>;

/// Opaque id of one open performance-data query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(pub(crate) u64);

/// Opaque id of one counter attached to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId(pub(crate) u64);

/// pdh.dll surface
pub trait PerfDataApi: Send + Sync {
    fn open_query(&self) -> NativeResult<QueryId>;

    fn add_counter(&self, query: QueryId, counter_path: &str) -> NativeResult<CounterId>;

    fn collect_query_data(&self, query: QueryId) -> NativeResult<()>;

    /// Formatted value of `counter` requested as a double
    fn formatted_double(&self, counter: CounterId) -> NativeResult<f64>;

    fn close_query(&self, query: QueryId) -> NativeResult<()>;
}

/// advapi32.dll surface
pub trait RegistryApi: Send + Sync {
    fn reg_get_string(&self, root: RegistryRoot, sub_key: &str, value: &str)
        -> NativeResult<String>;

    fn reg_get_u32(&self, root: RegistryRoot, sub_key: &str, value: &str) -> NativeResult<u32>;
}

/// kernel32.dll and iphlpapi.dll surface
pub trait SystemApi: Send + Sync {
    fn system_info(&self) -> ProcessorInfo;

    /// Milliseconds since boot
    fn tick_count(&self) -> u64;

    fn memory_status(&self) -> NativeResult<MemoryStatus>;

    /// Root path of every logical drive, e.g. `C:\`
    fn logical_drive_strings(&self) -> NativeResult<Vec<String>>;

    /// Raw drive type code for a root path
    fn drive_type(&self, root: &str) -> u32;

    fn disk_free_space(&self, root: &str) -> NativeResult<DiskSpace>;

    fn volume_information(&self, root: &str) -> NativeResult<VolumeInfo>;

    /// Target paths of an MS-DOS device name such as `C:`
    fn query_dos_device(&self, device: &str) -> NativeResult<Vec<String>>;

    fn adapters_info(&self) -> NativeResult<Vec<AdapterInfo>>;

    fn module_file_name(&self) -> NativeResult<String>;
}

/// Every native surface behind one handle
pub trait NativeGateway: PerfDataApi + RegistryApi + SystemApi {}

impl<T: PerfDataApi + RegistryApi + SystemApi> NativeGateway for T {}
