use std::ptr;

use windows_sys::Win32::System::Registry::{
    RegGetValueW, HKEY, HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER,
    HKEY_LOCAL_MACHINE, HKEY_USERS, RRF_RT_REG_DWORD, RRF_RT_REG_SZ,
};

use super::{check_status, from_wide, to_wide, WindowsGateway};
use crate::core::status::ERROR_MORE_DATA;
use crate::core::types::RegistryRoot;
use crate::platform::gateway::{NativeResult, Procedure, RegistryApi};

fn root_key(root: RegistryRoot) -> HKEY {
    match root {
        RegistryRoot::ClassesRoot => HKEY_CLASSES_ROOT,
        RegistryRoot::CurrentUser => HKEY_CURRENT_USER,
        RegistryRoot::LocalMachine => HKEY_LOCAL_MACHINE,
        RegistryRoot::Users => HKEY_USERS,
        RegistryRoot::CurrentConfig => HKEY_CURRENT_CONFIG,
    }
}

impl RegistryApi for WindowsGateway {
    fn reg_get_string(&self, root: RegistryRoot, sub_key: &str, value: &str) -> NativeResult<String> {
        let key = root_key(root);
        let sub_key = to_wide(sub_key);
        let value = to_wide(value);

        // first call sizes the buffer, in bytes
        let mut size: u32 = 0;
        let status = unsafe {
            RegGetValueW(
                key,
                sub_key.as_ptr(),
                value.as_ptr(),
                RRF_RT_REG_SZ,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut size,
            )
        };
        check_status(Procedure::RegGetValue, status as u32)?;
        if size == 0 {
            return Ok(String::new());
        }

        loop {
            let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
            let status = unsafe {
                RegGetValueW(
                    key,
                    sub_key.as_ptr(),
                    value.as_ptr(),
                    RRF_RT_REG_SZ,
                    ptr::null_mut(),
                    buffer.as_mut_ptr().cast(),
                    &mut size,
                )
            };
            // the value grew between calls, `size` now holds the new length
            if status as u32 == ERROR_MORE_DATA {
                continue;
            }
            check_status(Procedure::RegGetValue, status as u32)?;

            let len = (size as usize / 2).min(buffer.len());
            return Ok(from_wide(&buffer[..len]));
        }
    }

    fn reg_get_u32(&self, root: RegistryRoot, sub_key: &str, value: &str) -> NativeResult<u32> {
        let sub_key = to_wide(sub_key);
        let value = to_wide(value);
        let mut data: u32 = 0;
        let mut size = std::mem::size_of::<u32>() as u32;

        let status = unsafe {
            RegGetValueW(
                root_key(root),
                sub_key.as_ptr(),
                value.as_ptr(),
                RRF_RT_REG_DWORD,
                ptr::null_mut(),
                (&mut data as *mut u32).cast(),
                &mut size,
            )
        };
        check_status(Procedure::RegGetValue, status as u32)?;
        Ok(data)
    }
}
