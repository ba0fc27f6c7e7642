use image::RgbaImage;

use crate::models::device::{TrackInfo, TrackKind};
use crate::models::error::CaptureError;
use crate::traits::media_encoder::MediaEncoder;

/// A live stream holding hardware tracks.
///
/// Tracks stay live (camera light on) until `stop()` is called. `stop()`
/// must be idempotent.
pub trait MediaStream: Send {
    /// Tracks currently held by the stream.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Native size of the video track, `None` for audio-only streams.
    fn video_size(&self) -> Option<(u32, u32)>;

    /// The current video frame at native size.
    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError>;

    /// Create an encoder bound to this stream's tracks.
    ///
    /// Fails when the host cannot produce `mime_type`; pass `None` to let the
    /// host pick its default format.
    fn create_encoder(&mut self, mime_type: Option<&str>) -> Result<Box<dyn MediaEncoder>, CaptureError>;

    /// Release every track.
    fn stop(&mut self);

    fn has_video(&self) -> bool {
        self.tracks().iter().any(|t| t.kind == TrackKind::Video)
    }
}
