// Core logic: counter lifecycle plus the registry and system accessors

pub mod counter;
pub mod registry;
pub mod status;
pub mod system_probe;
pub mod types;

// Re-export commonly used items
pub use counter::{
    Collection, CounterCatalog, CounterInfo, CounterSession, CounterSet, CounterValueReader,
    Sample, SessionState,
};
pub use registry::RegistryAccessor;
pub use status::{Reading, StatusCode};
pub use system_probe::SystemProbe;
