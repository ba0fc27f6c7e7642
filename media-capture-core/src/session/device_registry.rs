use std::sync::Arc;

use crate::models::device::CaptureDevice;
use crate::traits::capture_host::CaptureHost;

/// Available cameras and the user's preferred one.
///
/// Enumeration never acquires hardware; selection is only a preference that
/// the stream session turns into an exact-device constraint.
pub struct DeviceRegistry<H: CaptureHost> {
    host: Arc<H>,
    devices: Vec<CaptureDevice>,
    selected: Option<String>,
}

impl<H: CaptureHost> DeviceRegistry<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            devices: Vec::new(),
            selected: None,
        }
    }

    /// Re-enumerate video inputs, replacing the previous snapshot.
    ///
    /// Enumeration failures are logged and yield an empty list. The first
    /// device becomes the selection if none is set.
    pub fn list_devices(&mut self) -> Vec<CaptureDevice> {
        self.devices = match self.host.enumerate_devices() {
            Ok(descriptors) => descriptors
                .into_iter()
                .filter_map(CaptureDevice::from_descriptor)
                .collect(),
            Err(e) => {
                log::warn!("Device enumeration failed: {}", e);
                Vec::new()
            }
        };

        if self.selected.is_none() {
            if let Some(first) = self.devices.first() {
                log::debug!("Defaulting to camera {} ({})", first.id, first.label);
                self.selected = Some(first.id.clone());
            }
        }

        self.devices.clone()
    }

    /// Record the preferred camera. Does not touch hardware.
    pub fn select_device(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.contains(&id) {
            log::warn!("Selecting camera {} which is not in the last enumeration", id);
        }
        self.selected = Some(id);
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Devices from the last enumeration.
    pub fn devices(&self) -> &[CaptureDevice] {
        &self.devices
    }

    pub fn contains(&self, id: &str) -> bool {
        self.devices.iter().any(|d| d.id == id)
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.id.as_str())
    }
}
