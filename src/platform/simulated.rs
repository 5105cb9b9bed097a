//! In-process gateway emulating the native subsystems.
//!
//! The counter side follows the performance-data helper's observable
//! behavior: counters read as invalid data until primed by a collection pass
//! (two passes for rate counters), handles die with their query, and
//! malformed or unknown paths are refused on attach. Registry and system
//! answers come from whatever the builder methods seeded.

use parking_lot::Mutex;
use std::collections::HashMap;

use super::gateway::{
    CounterId, NativeFailure, NativeResult, PerfDataApi, Procedure, QueryId, RegistryApi,
    SystemApi,
};
use crate::core::status::{
    ERROR_FILE_NOT_FOUND, PDH_CSTATUS_BAD_COUNTERNAME, PDH_INVALID_DATA, PDH_INVALID_HANDLE,
    PDH_NO_DATA,
};
use crate::core::types::{
    AdapterInfo, DiskSpace, MemoryStatus, ProcessorArchitecture, ProcessorInfo, RegistryRoot,
    VolumeInfo,
};

/// Counter path names an object/counter the subsystem does not publish
pub const PDH_CSTATUS_NO_COUNTER: u32 = 0xC000_0BB9;
/// Registry value exists with another type
pub const ERROR_UNSUPPORTED_TYPE: u32 = 1630;
const ERROR_INVALID_DRIVE: u32 = 15;
const ERROR_NOT_READY: u32 = 21;
const ERROR_NO_DATA: u32 = 232;
const DRIVE_NO_ROOT_DIR: u32 = 1;
const DRIVE_FIXED: u32 = 3;

#[derive(Debug, Clone)]
struct PublishedCounter {
    value: f64,
    /// Collection passes needed before the first value is available
    warmup: u32,
}

#[derive(Debug)]
struct OpenQuery {
    counters: Vec<u64>,
}

#[derive(Debug)]
struct AttachedCounter {
    query: u64,
    path: String,
    collections: u32,
}

#[derive(Debug, Clone)]
enum RegistryValue {
    String(String),
    U32(u32),
}

/// A drive known to the simulated host
#[derive(Debug, Clone)]
pub struct SimulatedDrive {
    pub root: String,
    pub drive_type: u32,
    /// `None` for drives without media, which fail space queries
    pub space: Option<DiskSpace>,
    pub volume: VolumeInfo,
}

impl SimulatedDrive {
    pub fn new<R: Into<String>>(root: R, drive_type: u32) -> Self {
        Self {
            root: root.into(),
            drive_type,
            space: None,
            volume: VolumeInfo::default(),
        }
    }

    /// Fixed NTFS drive with the given free and total bytes
    pub fn fixed<R: Into<String>>(root: R, free: u64, total: u64) -> Self {
        Self {
            root: root.into(),
            drive_type: DRIVE_FIXED,
            space: Some(DiskSpace {
                free_to_caller: free,
                total,
                total_free: free,
            }),
            volume: VolumeInfo {
                label: String::new(),
                serial_number: 0x1234_ABCD,
                max_component_length: 255,
                file_system_flags: 0,
                file_system: "NTFS".to_string(),
            },
        }
    }

    pub fn with_label<L: Into<String>>(mut self, label: L) -> Self {
        self.volume.label = label.into();
        self
    }
}

#[derive(Debug, Default)]
struct Scripts {
    open: Option<u32>,
    collect: Option<u32>,
    reads: HashMap<String, u32>,
}

#[derive(Debug)]
struct State {
    next_id: u64,
    published: HashMap<String, PublishedCounter>,
    queries: HashMap<u64, OpenQuery>,
    counters: HashMap<u64, AttachedCounter>,
    scripts: Scripts,
    calls: Vec<Procedure>,
    registry: HashMap<(RegistryRoot, String, String), RegistryValue>,
    processor: ProcessorInfo,
    tick_count: u64,
    memory: MemoryStatus,
    drives: Vec<SimulatedDrive>,
    adapters: Vec<AdapterInfo>,
    executable: String,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Deterministic stand-in for the native gateway
pub struct SimulatedGateway {
    state: Mutex<State>,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 0,
                published: HashMap::new(),
                queries: HashMap::new(),
                counters: HashMap::new(),
                scripts: Scripts::default(),
                calls: Vec::new(),
                registry: HashMap::new(),
                processor: ProcessorInfo {
                    architecture: ProcessorArchitecture::X64,
                    page_size: 4096,
                    number_of_processors: 8,
                    processor_type: 8664,
                    allocation_granularity: 65536,
                    processor_level: 6,
                    processor_revision: 0x9E0A,
                },
                tick_count: 0,
                memory: MemoryStatus {
                    memory_load: 50,
                    total_physical: 16u64 << 30,
                    available_physical: 8u64 << 30,
                    total_page_file: 20u64 << 30,
                    available_page_file: 10u64 << 30,
                    total_virtual: 128u64 << 40,
                    available_virtual: 127u64 << 40,
                },
                drives: Vec::new(),
                adapters: Vec::new(),
                executable: "C:\\Program Files\\hostprobe\\agent.exe".to_string(),
            }),
        }
    }

    // ---- builders ----

    /// Publish a counter path that is ready after one collection pass
    pub fn with_counter<P: Into<String>>(self, path: P, value: f64) -> Self {
        self.publish(path.into(), value, 1)
    }

    /// Publish a rate counter, which needs two collection passes
    pub fn with_rate_counter<P: Into<String>>(self, path: P, value: f64) -> Self {
        self.publish(path.into(), value, 2)
    }

    fn publish(self, path: String, value: f64, warmup: u32) -> Self {
        self.state
            .lock()
            .published
            .insert(path, PublishedCounter { value, warmup });
        self
    }

    pub fn with_registry_string<S: Into<String>>(
        self,
        root: RegistryRoot,
        sub_key: &str,
        value: &str,
        data: S,
    ) -> Self {
        self.state.lock().registry.insert(
            registry_key(root, sub_key, value),
            RegistryValue::String(data.into()),
        );
        self
    }

    pub fn with_registry_u32(self, root: RegistryRoot, sub_key: &str, value: &str, data: u32) -> Self {
        self.state
            .lock()
            .registry
            .insert(registry_key(root, sub_key, value), RegistryValue::U32(data));
        self
    }

    pub fn with_memory(self, memory: MemoryStatus) -> Self {
        self.state.lock().memory = memory;
        self
    }

    pub fn with_tick_count(self, millis: u64) -> Self {
        self.state.lock().tick_count = millis;
        self
    }

    pub fn with_drive(self, drive: SimulatedDrive) -> Self {
        self.state.lock().drives.push(drive);
        self
    }

    pub fn with_adapter(self, adapter: AdapterInfo) -> Self {
        self.state.lock().adapters.push(adapter);
        self
    }

    pub fn with_executable<P: Into<String>>(self, path: P) -> Self {
        self.state.lock().executable = path.into();
        self
    }

    // ---- runtime control ----

    /// Change the value a published counter reports from now on
    pub fn set_value(&self, path: &str, value: f64) {
        if let Some(counter) = self.state.lock().published.get_mut(path) {
            counter.value = value;
        }
    }

    /// Make every subsequent open fail with `status`
    pub fn script_open_failure(&self, status: u32) {
        self.state.lock().scripts.open = Some(status);
    }

    /// Make every subsequent collection fail with `status`
    pub fn script_collect_failure(&self, status: u32) {
        self.state.lock().scripts.collect = Some(status);
    }

    /// Make reads of counters on `path` return `status`
    pub fn script_read_status(&self, path: &str, status: u32) {
        self.state
            .lock()
            .scripts
            .reads
            .insert(path.to_string(), status);
    }

    pub fn clear_scripts(&self) {
        self.state.lock().scripts = Scripts::default();
    }

    // ---- inspection ----

    /// Every native call made so far, in order
    pub fn calls(&self) -> Vec<Procedure> {
        self.state.lock().calls.clone()
    }

    pub fn open_query_count(&self) -> usize {
        self.state.lock().queries.len()
    }

    pub fn live_counter_count(&self) -> usize {
        self.state.lock().counters.len()
    }
}

fn registry_key(root: RegistryRoot, sub_key: &str, value: &str) -> (RegistryRoot, String, String) {
    // registry names are case-insensitive
    (root, sub_key.to_lowercase(), value.to_lowercase())
}

/// `\Object(Instance)\Counter` or `\\Machine\Object\Counter`
fn is_well_formed(path: &str) -> bool {
    let rest = path.strip_prefix("\\\\").map_or(path, |remote| {
        remote.find('\\').map_or("", |idx| &remote[idx..])
    });
    match rest.strip_prefix('\\') {
        Some(body) => match body.rfind('\\') {
            Some(idx) => idx > 0 && idx + 1 < body.len(),
            None => false,
        },
        None => false,
    }
}

impl PerfDataApi for SimulatedGateway {
    fn open_query(&self) -> NativeResult<QueryId> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::PdhOpenQuery);
        if let Some(status) = state.scripts.open {
            return Err(NativeFailure::new(Procedure::PdhOpenQuery, status));
        }

        let id = state.next_id();
        state.queries.insert(id, OpenQuery { counters: Vec::new() });
        Ok(QueryId(id))
    }

    fn add_counter(&self, query: QueryId, counter_path: &str) -> NativeResult<CounterId> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::PdhAddCounter);
        if !state.queries.contains_key(&query.0) {
            return Err(NativeFailure::new(Procedure::PdhAddCounter, PDH_INVALID_HANDLE));
        }
        if !is_well_formed(counter_path) {
            return Err(NativeFailure::new(
                Procedure::PdhAddCounter,
                PDH_CSTATUS_BAD_COUNTERNAME,
            ));
        }
        if !state.published.contains_key(counter_path) {
            return Err(NativeFailure::new(
                Procedure::PdhAddCounter,
                PDH_CSTATUS_NO_COUNTER,
            ));
        }

        let id = state.next_id();
        state.counters.insert(
            id,
            AttachedCounter {
                query: query.0,
                path: counter_path.to_string(),
                collections: 0,
            },
        );
        if let Some(open) = state.queries.get_mut(&query.0) {
            open.counters.push(id);
        }
        Ok(CounterId(id))
    }

    fn collect_query_data(&self, query: QueryId) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::PdhCollectQueryData);
        if let Some(status) = state.scripts.collect {
            return Err(NativeFailure::new(Procedure::PdhCollectQueryData, status));
        }

        let members = match state.queries.get(&query.0) {
            Some(open) => open.counters.clone(),
            None => {
                return Err(NativeFailure::new(
                    Procedure::PdhCollectQueryData,
                    PDH_INVALID_HANDLE,
                ))
            }
        };
        if members.is_empty() {
            return Err(NativeFailure::new(Procedure::PdhCollectQueryData, PDH_NO_DATA));
        }

        for id in members {
            if let Some(counter) = state.counters.get_mut(&id) {
                counter.collections += 1;
            }
        }
        Ok(())
    }

    fn formatted_double(&self, counter: CounterId) -> NativeResult<f64> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::PdhGetFormattedCounterValue);
        let failure = |status| NativeFailure::new(Procedure::PdhGetFormattedCounterValue, status);

        let attached = match state.counters.get(&counter.0) {
            Some(attached) if state.queries.contains_key(&attached.query) => attached,
            _ => return Err(failure(PDH_INVALID_HANDLE)),
        };
        if let Some(status) = state.scripts.reads.get(&attached.path) {
            return Err(failure(*status));
        }

        match state.published.get(&attached.path) {
            Some(published) if attached.collections >= published.warmup => Ok(published.value),
            Some(_) => Err(failure(PDH_INVALID_DATA)),
            None => Err(failure(PDH_NO_DATA)),
        }
    }

    fn close_query(&self, query: QueryId) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::PdhCloseQuery);
        match state.queries.remove(&query.0) {
            Some(open) => {
                for id in open.counters {
                    state.counters.remove(&id);
                }
                Ok(())
            }
            None => Err(NativeFailure::new(Procedure::PdhCloseQuery, PDH_INVALID_HANDLE)),
        }
    }
}

impl RegistryApi for SimulatedGateway {
    fn reg_get_string(&self, root: RegistryRoot, sub_key: &str, value: &str) -> NativeResult<String> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::RegGetValue);
        match state.registry.get(&registry_key(root, sub_key, value)) {
            Some(RegistryValue::String(data)) => Ok(data.clone()),
            Some(_) => Err(NativeFailure::new(Procedure::RegGetValue, ERROR_UNSUPPORTED_TYPE)),
            None => Err(NativeFailure::new(Procedure::RegGetValue, ERROR_FILE_NOT_FOUND)),
        }
    }

    fn reg_get_u32(&self, root: RegistryRoot, sub_key: &str, value: &str) -> NativeResult<u32> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::RegGetValue);
        match state.registry.get(&registry_key(root, sub_key, value)) {
            Some(RegistryValue::U32(data)) => Ok(*data),
            Some(_) => Err(NativeFailure::new(Procedure::RegGetValue, ERROR_UNSUPPORTED_TYPE)),
            None => Err(NativeFailure::new(Procedure::RegGetValue, ERROR_FILE_NOT_FOUND)),
        }
    }
}

impl SystemApi for SimulatedGateway {
    fn system_info(&self) -> ProcessorInfo {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetSystemInfo);
        state.processor.clone()
    }

    fn tick_count(&self) -> u64 {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetTickCount64);
        state.tick_count
    }

    fn memory_status(&self) -> NativeResult<MemoryStatus> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GlobalMemoryStatusEx);
        Ok(state.memory.clone())
    }

    fn logical_drive_strings(&self) -> NativeResult<Vec<String>> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetLogicalDriveStrings);
        Ok(state.drives.iter().map(|drive| drive.root.clone()).collect())
    }

    fn drive_type(&self, root: &str) -> u32 {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetDriveType);
        state
            .drives
            .iter()
            .find(|drive| drive.root.eq_ignore_ascii_case(root))
            .map_or(DRIVE_NO_ROOT_DIR, |drive| drive.drive_type)
    }

    fn disk_free_space(&self, root: &str) -> NativeResult<DiskSpace> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetDiskFreeSpaceEx);
        match state
            .drives
            .iter()
            .find(|drive| drive.root.eq_ignore_ascii_case(root))
        {
            Some(drive) => drive.space.ok_or(NativeFailure::with_last_error(
                Procedure::GetDiskFreeSpaceEx,
                ERROR_NOT_READY,
            )),
            None => Err(NativeFailure::with_last_error(
                Procedure::GetDiskFreeSpaceEx,
                ERROR_INVALID_DRIVE,
            )),
        }
    }

    fn volume_information(&self, root: &str) -> NativeResult<VolumeInfo> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetVolumeInformation);
        match state
            .drives
            .iter()
            .find(|drive| drive.root.eq_ignore_ascii_case(root))
        {
            Some(drive) if drive.space.is_some() => Ok(drive.volume.clone()),
            Some(_) => Err(NativeFailure::with_last_error(
                Procedure::GetVolumeInformation,
                ERROR_NOT_READY,
            )),
            None => Err(NativeFailure::with_last_error(
                Procedure::GetVolumeInformation,
                ERROR_INVALID_DRIVE,
            )),
        }
    }

    fn query_dos_device(&self, device: &str) -> NativeResult<Vec<String>> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::QueryDosDevice);
        state
            .drives
            .iter()
            .position(|drive| drive.root.trim_end_matches('\\').eq_ignore_ascii_case(device))
            .map(|idx| vec![format!("\\Device\\HarddiskVolume{}", idx + 1)])
            .ok_or(NativeFailure::with_last_error(
                Procedure::QueryDosDevice,
                ERROR_FILE_NOT_FOUND,
            ))
    }

    fn adapters_info(&self) -> NativeResult<Vec<AdapterInfo>> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetAdaptersInfo);
        if state.adapters.is_empty() {
            return Err(NativeFailure::new(Procedure::GetAdaptersInfo, ERROR_NO_DATA));
        }
        Ok(state.adapters.clone())
    }

    fn module_file_name(&self) -> NativeResult<String> {
        let mut state = self.state.lock();
        state.calls.push(Procedure::GetModuleFileName);
        Ok(state.executable.clone())
    }
}
