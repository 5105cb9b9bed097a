use std::io;
use thiserror::Error;

use crate::core::counter::SessionState;
use crate::core::status::StatusCode;

/// Error type for every hostprobe operation
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to open counter query: {status}")]
    SessionOpen { status: StatusCode },

    #[error("Failed to attach counter '{counter_path}': {status}")]
    CounterAttach {
        counter_path: String,
        status: StatusCode,
    },

    #[error("Counter collection failed: {status}")]
    Collect { status: StatusCode },

    #[error("Cannot {operation} a session that is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("No counters attached to the session")]
    NoCounters,

    #[error("Cannot attach '{counter_path}' after the session has been collected")]
    AttachAfterCollect { counter_path: String },

    #[error("Registry value {sub_key}\\{value} could not be read: {status}")]
    Registry {
        sub_key: String,
        value: String,
        status: StatusCode,
    },

    #[error("Registry value not found: {sub_key}\\{value}")]
    RegistryNotFound { sub_key: String, value: String },

    #[error("{procedure} failed with code {code}")]
    Native { procedure: &'static str, code: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not supported on this platform: {0}")]
    NotSupported(String),
}

/// Result type alias for hostprobe
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    pub fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        ProbeError::InvalidState { operation, state }
    }

    pub fn counter_attach<S: Into<String>>(counter_path: S, status: StatusCode) -> Self {
        ProbeError::CounterAttach {
            counter_path: counter_path.into(),
            status,
        }
    }

    pub fn native(procedure: &'static str, code: u32) -> Self {
        ProbeError::Native { procedure, code }
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ProbeError::Config(msg.into())
    }

    pub fn not_supported<S: Into<String>>(msg: S) -> Self {
        ProbeError::NotSupported(msg.into())
    }

    /// Raw native status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProbeError::SessionOpen { status }
            | ProbeError::CounterAttach { status, .. }
            | ProbeError::Collect { status }
            | ProbeError::Registry { status, .. } => Some(*status),
            ProbeError::RegistryNotFound { .. } => Some(StatusCode::FileNotFound),
            ProbeError::Native { code, .. } => Some(StatusCode::from_raw(*code)),
            _ => None,
        }
    }
}
