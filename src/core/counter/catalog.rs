use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{ProbeError, Result};

/// One counter to attach: the name it is reported under and its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub name: String,
    pub path: String,
}

impl CounterSpec {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Read-only list of counters a monitoring agent samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCatalog {
    #[serde(default)]
    pub counters: Vec<CounterSpec>,
}

impl Default for CounterCatalog {
    fn default() -> Self {
        Self {
            counters: vec![
                CounterSpec::new("cpu", "\\Processor(_Total)\\% Processor Time"),
                CounterSpec::new("disk", "\\PhysicalDisk(_Total)\\% Disk Time"),
                CounterSpec::new("disk_queue", "\\PhysicalDisk(_Total)\\Current Disk Queue Length"),
                CounterSpec::new("mem_available_mb", "\\Memory\\Available MBytes"),
                CounterSpec::new("mem_committed", "\\Memory\\% Committed Bytes In Use"),
            ],
        }
    }
}

impl CounterCatalog {
    pub fn empty() -> Self {
        Self {
            counters: Vec::new(),
        }
    }

    pub fn with_counter<N: Into<String>, P: Into<String>>(mut self, name: N, path: P) -> Self {
        self.counters.push(CounterSpec::new(name, path));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: CounterCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        log::debug!("Loading counter catalog from {:?}", path);
        Self::from_json_str(&data)
    }

    /// Names must be non-empty and unique; paths must be full counter paths
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.counters {
            if spec.name.trim().is_empty() {
                return Err(ProbeError::config(format!(
                    "counter '{}' has an empty name",
                    spec.path
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(ProbeError::config(format!(
                    "duplicate counter name '{}'",
                    spec.name
                )));
            }
            if !spec.path.starts_with('\\') {
                return Err(ProbeError::config(format!(
                    "counter '{}' path must start with '\\': {}",
                    spec.name, spec.path
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CounterSpec> {
        self.counters.iter().find(|spec| spec.name == name)
    }
}
