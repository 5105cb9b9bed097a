use super::info::CounterInfo;
use crate::core::status::{Reading, StatusCode};
use crate::platform::gateway::PerfDataApi;

/// One "get formatted value" round trip per read, classified into a [`Reading`]
pub struct CounterValueReader<'g, G: PerfDataApi + ?Sized> {
    gateway: &'g G,
}

impl<'g, G: PerfDataApi + ?Sized> CounterValueReader<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Fetch the counter's latest value formatted as a double.
    ///
    /// Success yields `Ready`; no-data and invalid-data both yield `Pending`;
    /// an invalid handle yields `Invalid`; any other code is `Fatal`.
    pub fn read_double(&self, counter: &CounterInfo) -> Reading {
        match self.gateway.formatted_double(counter.handle().counter) {
            Ok(value) => Reading::Ready(value),
            Err(failure) => Reading::classify(StatusCode::from_raw(failure.code()), 0.0),
        }
    }
}
