use super::error::AcquisitionError;

/// Live stream state machine.
///
/// State transitions:
/// ```text
/// idle → requesting → active
///            ↓          ↓ stop()
///          error  ←→  idle
/// ```
/// `stop()` is accepted from every state and always lands in `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Idle,
    Requesting,
    Active,
    Error(AcquisitionError),
}

impl StreamState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn error(&self) -> Option<&AcquisitionError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Active => "active",
            Self::Error(_) => "error",
        }
    }
}

/// Recording state machine for one capture surface.
///
/// ```text
/// idle → recording → finalizing → idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording { elapsed_secs: f64 },
    Finalizing,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { .. } => "recording",
            Self::Finalizing => "finalizing",
        }
    }
}
