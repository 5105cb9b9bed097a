//! # hostprobe
//!
//! Native access to host telemetry on Windows without shelling out:
//! performance counters, registry values, memory status, logical drives,
//! network adapters and the running executable's path.
//!
//! ```rust,no_run
//! use hostprobe::{platform, CounterSession, Reading};
//!
//! fn main() -> hostprobe::Result<()> {
//!     let gateway = platform::native()?;
//!     let mut session = CounterSession::start(gateway)?;
//!     let cpu = session.attach_counter("cpu", "\\Processor(_Total)\\% Processor Time")?;
//!
//!     session.collect()?;
//!     std::thread::sleep(std::time::Duration::from_secs(1));
//!     session.collect()?;
//!
//!     match session.read_double(&cpu) {
//!         Reading::Ready(value) => println!("cpu: {:.1}%", value),
//!         Reading::Pending => println!("cpu: not ready yet"),
//!         other => println!("cpu: {:?}", other),
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub use error::{ProbeError, Result};

pub mod core;
pub mod platform;

// Re-export commonly used types
pub use crate::core::counter::{
    Collection, CounterCatalog, CounterInfo, CounterSession, CounterSet, CounterSpec,
    CounterValueReader, Sample, SessionState,
};
pub use crate::core::registry::RegistryAccessor;
pub use crate::core::status::{Reading, StatusCode};
pub use crate::core::system_probe::SystemProbe;
pub use crate::core::types::*;

/// Initialize logging; `RUST_LOG` overrides the default `info` level.
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
