//! Synthetic recorder.
//!
//! Emits a header chunk on `start`, then one numbered cluster chunk per
//! interval from a background thread, and a trailer chunk once `stop` has
//! joined the thread. Output is deterministic apart from the cluster count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use media_capture_core::models::error::CaptureError;
use media_capture_core::traits::media_encoder::{ChunkCallback, MediaEncoder};

/// EBML magic, so exported files sniff as WebM.
pub const HEADER_CHUNK: &[u8] = &[0x1a, 0x45, 0xdf, 0xa3];
pub const TRAILER_CHUNK: &[u8] = b"END";

pub struct SyntheticRecorder {
    mime_type: String,
    interval: Duration,
    sink: Option<ChunkCallback>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SyntheticRecorder {
    pub fn new(mime_type: impl Into<String>, interval: Duration) -> Self {
        Self {
            mime_type: mime_type.into(),
            interval,
            sink: None,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl MediaEncoder for SyntheticRecorder {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn start(&mut self, sink: ChunkCallback) -> Result<(), CaptureError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CaptureError::EncoderFailed("recorder already running".into()));
        }

        sink(HEADER_CHUNK);
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let thread_sink = Arc::clone(&sink);
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name("synthetic-recorder".into())
            .spawn(move || {
                let mut cluster: u32 = 0;
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    thread_sink(format!("cluster-{};", cluster).as_bytes());
                    cluster += 1;
                }
                log::debug!("Synthetic recorder emitted {} clusters", cluster);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::EncoderFailed(format!("failed to spawn recorder thread: {}", e))
            })?;

        self.handle = Some(handle);
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| CaptureError::EncoderFailed("recorder thread panicked".into()))?;
        }
        if let Some(sink) = self.sink.take() {
            sink(TRAILER_CHUNK);
        }
        Ok(())
    }
}

impl Drop for SyntheticRecorder {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn collecting_sink() -> (ChunkCallback, Arc<Mutex<Vec<Vec<u8>>>>) {
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&chunks);
        let sink: ChunkCallback = Arc::new(move |chunk: &[u8]| captured.lock().push(chunk.to_vec()));
        (sink, chunks)
    }

    #[test]
    fn stop_flushes_trailer_after_clusters() {
        let mut recorder = SyntheticRecorder::new("video/webm", Duration::from_millis(2));
        let (sink, chunks) = collecting_sink();
        recorder.start(sink).unwrap();
        thread::sleep(Duration::from_millis(20));
        recorder.stop().unwrap();

        let chunks = chunks.lock();
        assert_eq!(chunks.first().map(Vec::as_slice), Some(HEADER_CHUNK));
        assert_eq!(chunks.last().map(Vec::as_slice), Some(TRAILER_CHUNK));
        assert!(chunks.len() >= 3);
        assert_eq!(chunks[1], b"cluster-0;");
    }

    #[test]
    fn nothing_arrives_after_stop() {
        let mut recorder = SyntheticRecorder::new("video/webm", Duration::from_millis(1));
        let (sink, chunks) = collecting_sink();
        recorder.start(sink).unwrap();
        recorder.stop().unwrap();
        let count = chunks.lock().len();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(chunks.lock().len(), count);
    }

    #[test]
    fn double_start_is_rejected() {
        let mut recorder = SyntheticRecorder::new("audio/webm", Duration::from_millis(5));
        let (sink, _) = collecting_sink();
        recorder.start(Arc::clone(&sink)).unwrap();
        assert!(recorder.start(sink).is_err());
        recorder.stop().unwrap();
    }
}
