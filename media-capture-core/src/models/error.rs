use thiserror::Error;

/// Failures while acquiring a live stream from the host.
///
/// Never fatal: the stream session moves to `StreamState::Error` and the
/// surface keeps working.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available: {0}")]
    DeviceUnavailable(String),

    #[error("constraints unsatisfiable: {0}")]
    ConstraintsUnsatisfiable(String),

    /// The acquisition succeeded but `stop()` was requested while it was pending.
    #[error("acquisition aborted by stop request")]
    Aborted,
}

/// Failures while producing a photo or recording.
///
/// Raised before any record is created, so a failed capture never leaves a
/// partial record in the archive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no active stream")]
    NoActiveStream,

    #[error("stream has no video track")]
    NoVideoTrack,

    #[error("no recording in progress")]
    NotRecording,

    #[error("frame unavailable: {0}")]
    FrameUnavailable(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("encoder failed: {0}")]
    EncoderFailed(String),
}

/// Durable storage read/write failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("failed to serialize archive: {0}")]
    Serialize(String),

    #[error("failed to read archive: {0}")]
    Read(String),

    #[error("failed to write archive: {0}")]
    Write(String),

    #[error("corrupt archive: {0}")]
    Corrupt(String),
}

/// Failures while materialising a stored record as a downloadable file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Any error surfaced by a capture surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StudioError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl StudioError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Acquisition(AcquisitionError::PermissionDenied) => {
                "Failed to access media devices. Please check permissions.".to_string()
            }
            Self::Acquisition(AcquisitionError::DeviceUnavailable(_)) => {
                "Camera not available. Check that it is connected and not in use by another application."
                    .to_string()
            }
            Self::Acquisition(AcquisitionError::ConstraintsUnsatisfiable(_)) => {
                "The camera does not support these settings. Try a lower resolution or frame rate."
                    .to_string()
            }
            Self::Acquisition(AcquisitionError::Aborted) => "Camera request cancelled.".to_string(),
            Self::Persistence(e) => format!("Capture saved for this session only: {}", e),
            other => other.to_string(),
        }
    }
}
