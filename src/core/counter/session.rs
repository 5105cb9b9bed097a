use std::fmt;

use super::info::{CounterHandle, CounterId, CounterInfo, QueryId};
use super::reader::CounterValueReader;
use crate::core::status::{Reading, StatusCode};
use crate::error::{ProbeError, Result};
use crate::platform::gateway::PerfDataApi;

/// Lifecycle of a [`CounterSession`]. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Unopened => "unopened",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Result of one collection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Every attached counter was refreshed
    Complete,
    /// The subsystem had nothing to report yet; collect again next cycle
    NoDataYet,
}

/// One open performance-data query and the counters attached to it.
///
/// The session exclusively owns its native query: closing it (explicitly or
/// on drop) releases the query and invalidates every [`CounterInfo`] it
/// handed out. A session must not be driven from several threads at once.
pub struct CounterSession<'g, G: PerfDataApi + ?Sized> {
    gateway: &'g G,
    state: SessionState,
    query: Option<QueryId>,
    counters: Vec<CounterId>,
    collected: bool,
}

impl<'g, G: PerfDataApi + ?Sized> CounterSession<'g, G> {
    /// Create an unopened session bound to `gateway`
    pub fn new(gateway: &'g G) -> Self {
        Self {
            gateway,
            state: SessionState::Unopened,
            query: None,
            counters: Vec::new(),
            collected: false,
        }
    }

    /// Create a session and open its query in one step
    pub fn start(gateway: &'g G) -> Result<Self> {
        let mut session = Self::new(gateway);
        session.open()?;
        Ok(session)
    }

    pub fn open(&mut self) -> Result<()> {
        if self.state != SessionState::Unopened {
            return Err(ProbeError::invalid_state("open", self.state));
        }

        let query = self
            .gateway
            .open_query()
            .map_err(|failure| ProbeError::SessionOpen {
                status: StatusCode::from_raw(failure.code()),
            })?;

        self.query = Some(query);
        self.state = SessionState::Open;
        Ok(())
    }

    /// Attach `counter_path` under `display_name`.
    ///
    /// Attaching the same path twice yields two independent counters.
    pub fn attach_counter(&mut self, display_name: &str, counter_path: &str) -> Result<CounterInfo> {
        let query = self.open_query("attach a counter to")?;
        if self.collected {
            return Err(ProbeError::AttachAfterCollect {
                counter_path: counter_path.to_string(),
            });
        }

        let counter = self
            .gateway
            .add_counter(query, counter_path)
            .map_err(|failure| {
                ProbeError::counter_attach(counter_path, StatusCode::from_raw(failure.code()))
            })?;

        self.counters.push(counter);
        Ok(CounterInfo::new(
            display_name.to_string(),
            counter_path.to_string(),
            CounterHandle { query, counter },
        ))
    }

    /// Run one collection pass over every attached counter
    pub fn collect(&mut self) -> Result<Collection> {
        let query = self.open_query("collect")?;
        if self.counters.is_empty() {
            return Err(ProbeError::NoCounters);
        }

        let outcome = self.gateway.collect_query_data(query);
        self.collected = true;

        match outcome {
            Ok(()) => Ok(Collection::Complete),
            Err(failure) => match StatusCode::from_raw(failure.code()) {
                StatusCode::NoData => Ok(Collection::NoDataYet),
                status => Err(ProbeError::Collect { status }),
            },
        }
    }

    /// Read `counter` as a double.
    ///
    /// Counters of another or a closed session read as `Invalid`; counters
    /// that have not been through a collection pass read as `Pending`.
    pub fn read_double(&self, counter: &CounterInfo) -> Reading {
        if self.state != SessionState::Open || !self.owns(counter) {
            return Reading::Invalid;
        }
        if !self.collected {
            return Reading::Pending;
        }
        self.reader().read_double(counter)
    }

    /// Release the native query. Safe to call in any state, any number of times.
    pub fn close(&mut self) -> Result<()> {
        if self.state != SessionState::Open {
            return Ok(());
        }

        self.state = SessionState::Closed;
        self.counters.clear();
        match self.query.take() {
            Some(query) => self.gateway.close_query(query).map_err(ProbeError::from),
            None => Ok(()),
        }
    }

    pub fn reader(&self) -> CounterValueReader<'g, G> {
        CounterValueReader::new(self.gateway)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Whether a collection pass has been attempted
    pub fn has_collected(&self) -> bool {
        self.collected
    }

    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }

    pub fn owns(&self, counter: &CounterInfo) -> bool {
        let handle = counter.handle();
        self.query == Some(handle.query) && self.counters.contains(&handle.counter)
    }

    fn open_query(&self, operation: &'static str) -> Result<QueryId> {
        match (self.state, self.query) {
            (SessionState::Open, Some(query)) => Ok(query),
            (state, _) => Err(ProbeError::invalid_state(operation, state)),
        }
    }
}

impl<G: PerfDataApi + ?Sized> Drop for CounterSession<'_, G> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
