use serde::{Deserialize, Serialize};
use std::fmt;

/// Native success code shared by every library surface
pub const ERROR_SUCCESS: u32 = 0;
/// Registry key or value does not exist
pub const ERROR_FILE_NOT_FOUND: u32 = 2;
/// Returned by GetAdaptersInfo when the caller's buffer is too small
pub const ERROR_BUFFER_OVERFLOW: u32 = 111;
/// Returned by RegGetValueW when the caller's buffer is too small
pub const ERROR_MORE_DATA: u32 = 234;
pub const PDH_INVALID_HANDLE: u32 = 0xC000_0BBC;
pub const PDH_INVALID_DATA: u32 = 0xC000_0BC6;
pub const PDH_NO_DATA: u32 = 0x8000_07D5;
pub const PDH_CSTATUS_BAD_COUNTERNAME: u32 = 0xC000_0BC0;
pub const PDH_FMT_DOUBLE: u32 = 0x0000_0200;

/// Status vocabulary returned across the native boundary.
///
/// Every distinct platform constant keeps its own variant; anything else is
/// preserved verbatim in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Success,
    FileNotFound,
    InvalidHandle,
    InvalidData,
    NoData,
    Other(u32),
}

impl StatusCode {
    pub fn from_raw(code: u32) -> Self {
        match code {
            ERROR_SUCCESS => StatusCode::Success,
            ERROR_FILE_NOT_FOUND => StatusCode::FileNotFound,
            PDH_INVALID_HANDLE => StatusCode::InvalidHandle,
            PDH_INVALID_DATA => StatusCode::InvalidData,
            PDH_NO_DATA => StatusCode::NoData,
            other => StatusCode::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            StatusCode::Success => ERROR_SUCCESS,
            StatusCode::FileNotFound => ERROR_FILE_NOT_FOUND,
            StatusCode::InvalidHandle => PDH_INVALID_HANDLE,
            StatusCode::InvalidData => PDH_INVALID_DATA,
            StatusCode::NoData => PDH_NO_DATA,
            StatusCode::Other(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Success
    }
}

impl From<u32> for StatusCode {
    fn from(code: u32) -> Self {
        StatusCode::from_raw(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusCode::Success => "success",
            StatusCode::FileNotFound => "not found",
            StatusCode::InvalidHandle => "invalid handle",
            StatusCode::InvalidData => "invalid data",
            StatusCode::NoData => "no data",
            StatusCode::Other(_) => "native failure",
        };
        write!(f, "{} (0x{:08X})", label, self.raw())
    }
}

/// Outcome of one formatted counter read.
///
/// `Pending` is the normal state of a counter that has not been primed by a
/// collection pass yet. `Invalid` means the counter's session is gone and the
/// counter must be attached again. `Fatal` keeps the raw code for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Ready(f64),
    Pending,
    Invalid,
    Fatal(u32),
}

impl Reading {
    /// Classify the status of a "get formatted value" call
    pub fn classify(status: StatusCode, value: f64) -> Self {
        match status {
            StatusCode::Success => Reading::Ready(value),
            StatusCode::InvalidData | StatusCode::NoData => Reading::Pending,
            StatusCode::InvalidHandle => Reading::Invalid,
            other => Reading::Fatal(other.raw()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Ready(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Reading::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Reading::Pending)
    }

    /// True when retrying after the next collection cannot help
    pub fn is_fault(&self) -> bool {
        matches!(self, Reading::Invalid | Reading::Fatal(_))
    }
}
