use serde::{Deserialize, Serialize};

use super::catalog::CounterCatalog;
use super::info::CounterInfo;
use super::session::{Collection, CounterSession};
use crate::core::status::Reading;
use crate::error::Result;
use crate::platform::gateway::PerfDataApi;

/// Reading of one catalog counter from one collection pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub reading: Reading,
}

/// A session with every counter of a [`CounterCatalog`] attached.
///
/// Each [`sample`](CounterSet::sample) call is one collect pass followed by
/// one read per counter. The caller decides how often to sample.
pub struct CounterSet<'g, G: PerfDataApi + ?Sized> {
    session: CounterSession<'g, G>,
    counters: Vec<CounterInfo>,
}

impl<'g, G: PerfDataApi + ?Sized> CounterSet<'g, G> {
    pub fn open(gateway: &'g G, catalog: &CounterCatalog) -> Result<Self> {
        catalog.validate()?;

        let mut session = CounterSession::start(gateway)?;
        let mut counters = Vec::with_capacity(catalog.len());
        for spec in &catalog.counters {
            counters.push(session.attach_counter(&spec.name, &spec.path)?);
        }
        log::debug!("Counter set opened with {} counters", counters.len());

        Ok(Self { session, counters })
    }

    pub fn sample(&mut self) -> Result<Vec<Sample>> {
        if self.session.collect()? == Collection::NoDataYet {
            log::debug!("Collection pass returned no data yet");
        }

        let samples = self
            .counters
            .iter()
            .map(|counter| {
                let reading = self.session.read_double(counter);
                match reading {
                    Reading::Ready(_) => {}
                    Reading::Pending => log::debug!("Counter '{}' not ready", counter.post_name()),
                    Reading::Invalid => log::warn!(
                        "Counter '{}' ({}) has a stale handle",
                        counter.post_name(),
                        counter.counter_path()
                    ),
                    Reading::Fatal(code) => log::warn!(
                        "Counter '{}' ({}) failed with 0x{:08X}",
                        counter.post_name(),
                        counter.counter_path(),
                        code
                    ),
                }
                Sample {
                    name: counter.post_name().to_string(),
                    reading,
                }
            })
            .collect();

        Ok(samples)
    }

    pub fn counters(&self) -> &[CounterInfo] {
        &self.counters
    }

    pub fn session(&self) -> &CounterSession<'g, G> {
        &self.session
    }

    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }
}
