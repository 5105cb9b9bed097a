//! Performance-counter query lifecycle.
//!
//! A [`CounterSession`] owns one native query. Counters are attached to it,
//! then the caller repeatedly runs [`CounterSession::collect`] and reads each
//! counter through a [`CounterValueReader`] on whatever cadence it likes.

pub mod catalog;
pub mod info;
pub mod reader;
pub mod sampler;
pub mod session;

pub use catalog::{CounterCatalog, CounterSpec};
pub use info::{CounterHandle, CounterId, CounterInfo, QueryId};
pub use reader::CounterValueReader;
pub use sampler::{CounterSet, Sample};
pub use session::{Collection, CounterSession, SessionState};
