use std::sync::Arc;

use crate::models::error::CaptureError;

/// Callback invoked with each encoded chunk.
///
/// May fire on an encoder thread; keep processing minimal.
pub type ChunkCallback = Arc<dyn Fn(&[u8]) + Send + Sync + 'static>;

/// Streaming encoder bound to a live stream's tracks.
pub trait MediaEncoder: Send {
    /// Container/codec this encoder produces, e.g. `video/webm;codecs=vp9,opus`.
    fn mime_type(&self) -> &str;

    /// Begin encoding, delivering chunks via `sink`.
    fn start(&mut self, sink: ChunkCallback) -> Result<(), CaptureError>;

    /// Stop encoding. Every pending chunk has been delivered to the sink when
    /// this returns.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
