use serde::{Deserialize, Serialize};

/// Kind of host device, as reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Raw device entry delivered by a `CaptureHost`.
///
/// Hosts may report entries with empty ids or labels (labels are commonly
/// hidden until permission is granted); use `CaptureDevice::from_descriptor`
/// to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub device_id: String,
    pub label: String,
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// A video input the user can pick. Immutable snapshot from one enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureDevice {
    pub id: String,
    pub label: String,
}

impl CaptureDevice {
    /// Validate a raw descriptor. Returns `None` for non-video devices and
    /// entries without an id.
    pub fn from_descriptor(descriptor: DeviceDescriptor) -> Option<Self> {
        if descriptor.kind != DeviceKind::VideoInput || descriptor.device_id.is_empty() {
            return None;
        }

        let label = if descriptor.label.trim().is_empty() {
            let prefix: String = descriptor.device_id.chars().take(5).collect();
            format!("Camera {}...", prefix)
        } else {
            descriptor.label
        };

        Some(Self {
            id: descriptor.device_id,
            label,
        })
    }
}

/// Kind of a live media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

/// A live track held by an active stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub kind: TrackKind,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_input_becomes_capture_device() {
        let device = CaptureDevice::from_descriptor(DeviceDescriptor::new(
            "cam-0",
            "Integrated Webcam",
            DeviceKind::VideoInput,
        ))
        .unwrap();
        assert_eq!(device.id, "cam-0");
        assert_eq!(device.label, "Integrated Webcam");
    }

    #[test]
    fn non_video_devices_are_rejected() {
        let mic = DeviceDescriptor::new("mic-0", "Microphone", DeviceKind::AudioInput);
        let speaker = DeviceDescriptor::new("out-0", "Speakers", DeviceKind::AudioOutput);
        assert!(CaptureDevice::from_descriptor(mic).is_none());
        assert!(CaptureDevice::from_descriptor(speaker).is_none());
    }

    #[test]
    fn empty_id_is_rejected() {
        let d = DeviceDescriptor::new("", "Ghost", DeviceKind::VideoInput);
        assert!(CaptureDevice::from_descriptor(d).is_none());
    }

    #[test]
    fn missing_label_falls_back_to_id_prefix() {
        let d = DeviceDescriptor::new("a1b2c3d4e5", "  ", DeviceKind::VideoInput);
        let device = CaptureDevice::from_descriptor(d).unwrap();
        assert_eq!(device.label, "Camera a1b2c...");
    }
}
