use std::mem;
use std::ptr;

use windows_sys::Win32::NetworkManagement::IpHelper::{
    GetAdaptersInfo, IP_ADAPTER_INFO, IP_ADDR_STRING,
};
use windows_sys::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    QueryDosDeviceW,
};
use windows_sys::Win32::System::LibraryLoader::GetModuleFileNameW;
use windows_sys::Win32::System::SystemInformation::{
    GetSystemInfo, GetTickCount64, GlobalMemoryStatusEx, MEMORYSTATUSEX, SYSTEM_INFO,
};

use super::{check_bool, check_status, from_wide, last_error, split_multi_wide, to_wide, WindowsGateway};
use crate::core::status::ERROR_BUFFER_OVERFLOW;
use crate::core::types::{
    format_mac, AdapterInfo, DiskSpace, MemoryStatus, ProcessorArchitecture, ProcessorInfo,
    VolumeInfo,
};
use crate::platform::gateway::{NativeFailure, NativeResult, Procedure, SystemApi};

const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
const MAX_PATH: usize = 260;
/// Longest path the wide APIs accept
const MAX_LONG_PATH: usize = 32_768;

/// ANSI `CHAR` array up to the first NUL
fn ansi_to_string<T: Copy + Into<i16>>(chars: &[T]) -> String {
    let bytes: Vec<u8> = chars
        .iter()
        .map(|&c| Into::<i16>::into(c) as u8)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Walk an `IP_ADDR_STRING` list
///
/// # Safety
/// `head` must be the first node of a list owned by a live adapter buffer.
unsafe fn address_list(head: *const IP_ADDR_STRING) -> Vec<String> {
    let mut addresses = Vec::new();
    let mut cursor = head;
    while !cursor.is_null() {
        let entry = &*cursor;
        let address = ansi_to_string(&entry.IpAddress.String);
        if !address.is_empty() {
            addresses.push(address);
        }
        cursor = entry.Next.cast_const();
    }
    addresses
}

impl SystemApi for WindowsGateway {
    fn system_info(&self) -> ProcessorInfo {
        let mut info: SYSTEM_INFO = unsafe { mem::zeroed() };
        unsafe { GetSystemInfo(&mut info) };
        log::trace!("{} succeeded", Procedure::GetSystemInfo);

        let architecture = unsafe { info.Anonymous.Anonymous.wProcessorArchitecture };
        ProcessorInfo {
            architecture: ProcessorArchitecture::from_raw(architecture as u16),
            page_size: info.dwPageSize,
            number_of_processors: info.dwNumberOfProcessors,
            processor_type: info.dwProcessorType,
            allocation_granularity: info.dwAllocationGranularity,
            processor_level: info.wProcessorLevel,
            processor_revision: info.wProcessorRevision,
        }
    }

    fn tick_count(&self) -> u64 {
        unsafe { GetTickCount64() }
    }

    fn memory_status(&self) -> NativeResult<MemoryStatus> {
        let mut status: MEMORYSTATUSEX = unsafe { mem::zeroed() };
        status.dwLength = mem::size_of::<MEMORYSTATUSEX>() as u32;
        let ok = unsafe { GlobalMemoryStatusEx(&mut status) } != 0;
        check_bool(Procedure::GlobalMemoryStatusEx, ok)?;

        Ok(MemoryStatus {
            memory_load: status.dwMemoryLoad,
            total_physical: status.ullTotalPhys,
            available_physical: status.ullAvailPhys,
            total_page_file: status.ullTotalPageFile,
            available_page_file: status.ullAvailPageFile,
            total_virtual: status.ullTotalVirtual,
            available_virtual: status.ullAvailVirtual,
        })
    }

    fn logical_drive_strings(&self) -> NativeResult<Vec<String>> {
        // returns the required length including the final NUL when the buffer is too small
        let required = unsafe { GetLogicalDriveStringsW(0, ptr::null_mut()) };
        check_bool(Procedure::GetLogicalDriveStrings, required != 0)?;

        let mut buffer = vec![0u16; required as usize + 1];
        let written = unsafe { GetLogicalDriveStringsW(buffer.len() as u32, buffer.as_mut_ptr()) };
        check_bool(Procedure::GetLogicalDriveStrings, written != 0)?;

        buffer.truncate(written as usize + 1);
        Ok(split_multi_wide(&buffer))
    }

    fn drive_type(&self, root: &str) -> u32 {
        let root = to_wide(root);
        unsafe { GetDriveTypeW(root.as_ptr()) }
    }

    fn disk_free_space(&self, root: &str) -> NativeResult<DiskSpace> {
        let root = to_wide(root);
        let mut space = DiskSpace::default();
        let ok = unsafe {
            GetDiskFreeSpaceExW(
                root.as_ptr(),
                &mut space.free_to_caller,
                &mut space.total,
                &mut space.total_free,
            )
        } != 0;
        check_bool(Procedure::GetDiskFreeSpaceEx, ok)?;
        Ok(space)
    }

    fn volume_information(&self, root: &str) -> NativeResult<VolumeInfo> {
        let root = to_wide(root);
        let mut label = [0u16; MAX_PATH + 1];
        let mut file_system = [0u16; MAX_PATH + 1];
        let mut info = VolumeInfo::default();

        let ok = unsafe {
            GetVolumeInformationW(
                root.as_ptr(),
                label.as_mut_ptr(),
                label.len() as u32,
                &mut info.serial_number,
                &mut info.max_component_length,
                &mut info.file_system_flags,
                file_system.as_mut_ptr(),
                file_system.len() as u32,
            )
        } != 0;
        check_bool(Procedure::GetVolumeInformation, ok)?;

        info.label = from_wide(&label);
        info.file_system = from_wide(&file_system);
        Ok(info)
    }

    fn query_dos_device(&self, device: &str) -> NativeResult<Vec<String>> {
        let device = to_wide(device);
        let mut capacity = MAX_PATH;
        loop {
            let mut buffer = vec![0u16; capacity];
            let written =
                unsafe { QueryDosDeviceW(device.as_ptr(), buffer.as_mut_ptr(), capacity as u32) };
            if written != 0 {
                buffer.truncate(written as usize);
                return Ok(split_multi_wide(&buffer));
            }

            let code = last_error();
            if code != ERROR_INSUFFICIENT_BUFFER || capacity >= MAX_LONG_PATH {
                return Err(NativeFailure::with_last_error(Procedure::QueryDosDevice, code));
            }
            capacity *= 2;
        }
    }

    fn adapters_info(&self) -> NativeResult<Vec<AdapterInfo>> {
        // u64 storage keeps the adapter records aligned
        let mut size = (mem::size_of::<IP_ADAPTER_INFO>() * 4) as u32;
        let mut buffer: Vec<u64>;
        loop {
            buffer = vec![0u64; (size as usize).div_ceil(8)];
            let status =
                unsafe { GetAdaptersInfo(buffer.as_mut_ptr().cast::<IP_ADAPTER_INFO>(), &mut size) };
            if status as u32 == ERROR_BUFFER_OVERFLOW {
                continue;
            }
            check_status(Procedure::GetAdaptersInfo, status as u32)?;
            break;
        }

        let mut adapters = Vec::new();
        let mut cursor = buffer.as_ptr().cast::<IP_ADAPTER_INFO>();
        while !cursor.is_null() {
            let adapter = unsafe { &*cursor };
            let mac_len = (adapter.AddressLength as usize).min(adapter.Address.len());
            adapters.push(AdapterInfo {
                name: ansi_to_string(&adapter.AdapterName),
                description: ansi_to_string(&adapter.Description),
                mac_address: format_mac(&adapter.Address[..mac_len]),
                ip_addresses: unsafe { address_list(&adapter.IpAddressList) },
                gateways: unsafe { address_list(&adapter.GatewayList) },
            });
            cursor = adapter.Next.cast_const();
        }
        Ok(adapters)
    }

    fn module_file_name(&self) -> NativeResult<String> {
        let mut capacity = MAX_PATH;
        loop {
            let mut buffer = vec![0u16; capacity];
            let written = unsafe {
                GetModuleFileNameW(mem::zeroed(), buffer.as_mut_ptr(), capacity as u32)
            } as usize;
            check_bool(Procedure::GetModuleFileName, written != 0)?;

            // a full buffer means the path was truncated
            if written < capacity || capacity >= MAX_LONG_PATH {
                return Ok(from_wide(&buffer[..written.min(capacity)]));
            }
            capacity *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_probe::SystemProbe;
    use crate::core::types::DriveKind;
    use crate::platform::windows::gateway;

    #[test]
    fn test_ansi_to_string_stops_at_nul() {
        let raw: [u8; 6] = [b'e', b't', b'h', 0, b'x', 0];
        assert_eq!(ansi_to_string(&raw), "eth");
    }

    #[test]
    fn test_memory_status_is_consistent() {
        let status = SystemProbe::new(gateway()).memory_status().unwrap();
        assert!(status.total_physical > 0);
        assert!(status.available_physical <= status.total_physical);
    }

    #[test]
    fn test_system_drive_is_fixed() {
        let probe = SystemProbe::new(gateway());
        let drives = probe.logical_drives().unwrap();
        assert!(!drives.is_empty());
        let system = std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string());
        assert_eq!(probe.drive_kind(&format!("{}\\", system)), DriveKind::Fixed);
    }

    #[test]
    fn test_executable_path_matches_std() {
        let path = SystemProbe::new(gateway()).executable_path().unwrap();
        assert_eq!(path, std::env::current_exe().unwrap());
    }
}
