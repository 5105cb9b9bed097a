// Platform-specific code module

pub mod gateway;
pub mod simulated;
#[cfg(windows)]
pub mod windows;

pub use gateway::{NativeFailure, NativeGateway, PerfDataApi, Procedure, RegistryApi, SystemApi};
pub use simulated::SimulatedGateway;

use crate::error::{ProbeError, Result};

/// The process-wide native gateway.
///
/// Initialized once on first use; every later call returns the same instance.
pub fn native() -> Result<&'static dyn NativeGateway> {
    #[cfg(windows)]
    return Ok(windows::gateway());

    #[cfg(not(windows))]
    Err(ProbeError::not_supported(
        "native telemetry requires Windows",
    ))
}
