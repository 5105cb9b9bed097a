use std::path::PathBuf;
use std::time::Duration;

use crate::core::types::{
    AdapterInfo, DiskSpace, DriveInfo, DriveKind, MemoryStatus, ProcessorInfo, VolumeInfo,
};
use crate::error::Result;
use crate::platform::gateway::SystemApi;

/// Read-only host facts: memory, drives, adapters, executable path
pub struct SystemProbe<'g, G: SystemApi + ?Sized> {
    gateway: &'g G,
}

impl<'g, G: SystemApi + ?Sized> SystemProbe<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    pub fn processor_info(&self) -> ProcessorInfo {
        self.gateway.system_info()
    }

    /// Time since boot
    pub fn uptime(&self) -> Duration {
        Duration::from_millis(self.gateway.tick_count())
    }

    pub fn memory_status(&self) -> Result<MemoryStatus> {
        Ok(self.gateway.memory_status()?)
    }

    /// Root paths of all logical drives, e.g. `C:\`
    pub fn logical_drives(&self) -> Result<Vec<String>> {
        Ok(self.gateway.logical_drive_strings()?)
    }

    pub fn drive_kind(&self, root: &str) -> DriveKind {
        DriveKind::from_raw(self.gateway.drive_type(root))
    }

    /// Every logical drive with its classification
    pub fn drives(&self) -> Result<Vec<DriveInfo>> {
        Ok(self
            .logical_drives()?
            .into_iter()
            .map(|root| {
                let kind = self.drive_kind(&root);
                DriveInfo { root, kind }
            })
            .collect())
    }

    /// Roots of fixed (non-removable, local) drives
    pub fn fixed_drives(&self) -> Result<Vec<String>> {
        Ok(self
            .drives()?
            .into_iter()
            .filter(|drive| drive.kind == DriveKind::Fixed)
            .map(|drive| drive.root)
            .collect())
    }

    pub fn disk_space(&self, root: &str) -> Result<DiskSpace> {
        Ok(self.gateway.disk_free_space(root)?)
    }

    pub fn volume_info(&self, root: &str) -> Result<VolumeInfo> {
        Ok(self.gateway.volume_information(root)?)
    }

    /// Device paths behind a drive such as `C:`; a trailing `\` is ignored
    pub fn dos_device(&self, drive: &str) -> Result<Vec<String>> {
        let device = drive.trim_end_matches('\\');
        Ok(self.gateway.query_dos_device(device)?)
    }

    pub fn network_adapters(&self) -> Result<Vec<AdapterInfo>> {
        Ok(self.gateway.adapters_info()?)
    }

    pub fn executable_path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(self.gateway.module_file_name()?))
    }
}
