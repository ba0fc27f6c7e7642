use crate::models::media_record::MediaRecord;
use crate::models::state::{RecordingState, StreamState};

/// Event sink for the Control Surface.
///
/// Called synchronously from whichever thread drove the state change.
/// Implementations should marshal to the UI thread if needed.
pub trait SurfaceDelegate: Send + Sync {
    /// Called when the stream session state changes.
    fn on_stream_state_changed(&self, state: &StreamState);

    /// Called when the recording session state changes.
    fn on_recording_state_changed(&self, state: &RecordingState);

    /// Called with a user-facing message whenever an operation fails.
    fn on_error(&self, message: &str);

    /// Called after a capture has been added to the archive.
    fn on_record_archived(&self, record: &MediaRecord);

    /// Called after a record has been deleted from the archive.
    fn on_record_removed(&self, _id: &str) {}
}
