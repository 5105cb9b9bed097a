//! Native gateway backed by `windows-sys`.
//!
//! Raw query and counter handles never leave this module: callers hold
//! opaque [`QueryId`]/[`CounterId`] values that index the handle table below.
//! Closing a query drops its counters from the table, so a stale id resolves
//! to `PDH_INVALID_HANDLE` without reaching the OS.

mod pdh;
mod registry;
mod system;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;

use windows_sys::Win32::Foundation::GetLastError;

use super::gateway::{CounterId, NativeFailure, NativeResult, Procedure, QueryId};
use crate::core::status::ERROR_SUCCESS;

/// Process-wide gateway, initialized on first use
static GATEWAY: Lazy<WindowsGateway> = Lazy::new(|| {
    log::debug!("Initializing native gateway");
    WindowsGateway::new()
});

pub fn gateway() -> &'static WindowsGateway {
    &GATEWAY
}

#[derive(Debug)]
struct QueryEntry {
    raw: usize,
    counters: Vec<u64>,
}

#[derive(Debug)]
struct CounterEntry {
    raw: usize,
}

#[derive(Debug, Default)]
struct HandleTable {
    next_id: u64,
    queries: HashMap<u64, QueryEntry>,
    counters: HashMap<u64, CounterEntry>,
}

impl HandleTable {
    fn insert_query(&mut self, raw: usize) -> QueryId {
        self.next_id += 1;
        self.queries.insert(
            self.next_id,
            QueryEntry {
                raw,
                counters: Vec::new(),
            },
        );
        QueryId(self.next_id)
    }

    fn insert_counter(&mut self, query: QueryId, raw: usize) -> Option<CounterId> {
        self.next_id += 1;
        let id = self.next_id;
        let entry = self.queries.get_mut(&query.0)?;
        entry.counters.push(id);
        self.counters.insert(id, CounterEntry { raw });
        Some(CounterId(id))
    }

    fn query(&self, query: QueryId) -> Option<usize> {
        self.queries.get(&query.0).map(|entry| entry.raw)
    }

    fn counter(&self, counter: CounterId) -> Option<usize> {
        self.counters.get(&counter.0).map(|entry| entry.raw)
    }

    fn remove_query(&mut self, query: QueryId) -> Option<usize> {
        let entry = self.queries.remove(&query.0)?;
        for id in &entry.counters {
            self.counters.remove(id);
        }
        Some(entry.raw)
    }
}

/// Gateway over advapi32, kernel32, pdh and iphlpapi
pub struct WindowsGateway {
    handles: Mutex<HandleTable>,
}

impl WindowsGateway {
    fn new() -> Self {
        Self {
            handles: Mutex::new(HandleTable::default()),
        }
    }
}

fn last_error() -> u32 {
    unsafe { GetLastError() }
}

/// Map a status-returning call onto `Ok`/`NativeFailure`
fn check_status(procedure: Procedure, status: u32) -> NativeResult<()> {
    log::trace!("{} returned 0x{:08X}", procedure, status);
    if status == ERROR_SUCCESS {
        Ok(())
    } else {
        log::debug!("{} failed with 0x{:08X}", procedure, status);
        Err(NativeFailure::new(procedure, status))
    }
}

/// Map a BOOL-returning call onto `Ok`/`NativeFailure`, capturing the last error
fn check_bool(procedure: Procedure, succeeded: bool) -> NativeResult<()> {
    if succeeded {
        log::trace!("{} succeeded", procedure);
        Ok(())
    } else {
        let code = last_error();
        log::debug!("{} failed, last error {}", procedure, code);
        Err(NativeFailure::with_last_error(procedure, code))
    }
}

/// NUL-terminated UTF-16 copy of `value`
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// String up to the first NUL
fn from_wide(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Split a double-NUL-terminated UTF-16 list
fn split_multi_wide(buffer: &[u16]) -> Vec<String> {
    buffer
        .split(|&c| c == 0)
        .take_while(|entry| !entry.is_empty())
        .map(String::from_utf16_lossy)
        .collect()
}
