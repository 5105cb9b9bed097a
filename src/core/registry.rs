use crate::core::status::StatusCode;
use crate::core::types::RegistryRoot;
use crate::error::{ProbeError, Result};
use crate::platform::gateway::{NativeFailure, RegistryApi};

/// Single-value registry lookups
pub struct RegistryAccessor<'g, G: RegistryApi + ?Sized> {
    gateway: &'g G,
}

impl<'g, G: RegistryApi + ?Sized> RegistryAccessor<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Read a string value. An existing empty value yields `""`.
    pub fn get_string(&self, root: RegistryRoot, sub_key: &str, value: &str) -> Result<String> {
        self.gateway
            .reg_get_string(root, sub_key, value)
            .map_err(|failure| registry_error(failure, sub_key, value))
    }

    pub fn get_u32(&self, root: RegistryRoot, sub_key: &str, value: &str) -> Result<u32> {
        self.gateway
            .reg_get_u32(root, sub_key, value)
            .map_err(|failure| registry_error(failure, sub_key, value))
    }

    /// Like [`get_string`](Self::get_string) but a missing value is `None`
    pub fn find_string(
        &self,
        root: RegistryRoot,
        sub_key: &str,
        value: &str,
    ) -> Result<Option<String>> {
        match self.get_string(root, sub_key, value) {
            Ok(data) => Ok(Some(data)),
            Err(ProbeError::RegistryNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn find_u32(&self, root: RegistryRoot, sub_key: &str, value: &str) -> Result<Option<u32>> {
        match self.get_u32(root, sub_key, value) {
            Ok(data) => Ok(Some(data)),
            Err(ProbeError::RegistryNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn registry_error(failure: NativeFailure, sub_key: &str, value: &str) -> ProbeError {
    match StatusCode::from_raw(failure.code()) {
        StatusCode::FileNotFound => ProbeError::RegistryNotFound {
            sub_key: sub_key.to_string(),
            value: value.to_string(),
        },
        status => ProbeError::Registry {
            sub_key: sub_key.to_string(),
            value: value.to_string(),
            status,
        },
    }
}
