pub use crate::platform::gateway::{CounterId, QueryId};

/// Native counter bound to the query that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterHandle {
    pub query: QueryId,
    pub counter: CounterId,
}

/// A counter attached to a session: display name, counter path and handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterInfo {
    post_name: String,
    counter_path: String,
    handle: CounterHandle,
}

impl CounterInfo {
    pub(crate) fn new(post_name: String, counter_path: String, handle: CounterHandle) -> Self {
        Self {
            post_name,
            counter_path,
            handle,
        }
    }

    /// Caller-chosen name the value is reported under
    pub fn post_name(&self) -> &str {
        &self.post_name
    }

    pub fn counter_path(&self) -> &str {
        &self.counter_path
    }

    pub fn handle(&self) -> CounterHandle {
        self.handle
    }
}
