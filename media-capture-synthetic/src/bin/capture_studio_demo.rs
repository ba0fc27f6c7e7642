//! Drives a capture surface against the synthetic host: takes a filtered
//! photo, records a short video and an audio clip, then exports the newest
//! record next to the archive.
//!
//! Usage: `capture-studio-demo [FILTER] [STORAGE_DIR]`

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use media_capture_core::{
    CaptureMode, CaptureSurface, FileStore, MediaRecord, RecordingState, Resolution, StreamConfig, StreamState,
    StudioConfiguration, StyleFilter, SurfaceDelegate, FRAME_RATE_PRESETS,
};
use media_capture_synthetic::SyntheticHost;

struct LogDelegate;

impl SurfaceDelegate for LogDelegate {
    fn on_stream_state_changed(&self, state: &StreamState) {
        log::info!("stream → {}", state.name());
    }

    fn on_recording_state_changed(&self, state: &RecordingState) {
        log::info!("recording → {}", state.name());
    }

    fn on_error(&self, message: &str) {
        log::error!("{}", message);
    }

    fn on_record_archived(&self, record: &MediaRecord) {
        log::info!("archived {} {}", record.media_type, record.id);
    }

    fn on_record_removed(&self, id: &str) {
        log::info!("removed {}", id);
    }
}

fn storage_dir(arg: Option<String>) -> PathBuf {
    arg.map(PathBuf::from).unwrap_or_else(|| {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("capture-studio")
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let filter: StyleFilter = args.next().as_deref().unwrap_or("Vintage").parse()?;
    let dir = storage_dir(args.next());

    let config = StudioConfiguration::default();
    config.validate()?;

    let host = Arc::new(SyntheticHost::new());
    let mut surface = CaptureSurface::open(Arc::clone(&host), Arc::new(FileStore::new(&dir)), config);
    surface.set_delegate(Arc::new(LogDelegate));
    log::info!("Archive at {} holds {} records", dir.display(), surface.archive().len());

    for device in surface.list_devices() {
        log::info!("camera {} ({})", device.label, device.id);
    }
    let resolutions: Vec<String> = Resolution::PRESETS.iter().map(Resolution::to_string).collect();
    log::info!(
        "settings: resolutions [{}], frame rates {:?}",
        resolutions.join(", "),
        FRAME_RATE_PRESETS
    );

    // Photo tab
    surface.start_default()?;
    let adjustments = surface.adjust(|a| {
        a.set_filter(filter);
        a.set_contrast(120);
    });
    log::info!("preview filter: {}", adjustments.css_filter());
    let photo = surface.capture_photo()?;
    log::info!("photo checksum {}", photo.checksum);

    // Video tab
    surface.start(StreamConfig::new(Resolution::FULL_HD, 30, CaptureMode::VideoWithAudio))?;
    surface.start_recording()?;
    thread::sleep(Duration::from_millis(250));
    let video = surface.stop_recording()?;
    log::info!(
        "video {:.2}s checksum {}",
        video.record.duration.unwrap_or_default(),
        video.checksum
    );

    // Audio tab
    surface.start(StreamConfig::new(Resolution::default(), 30, CaptureMode::AudioOnly))?;
    surface.start_recording()?;
    thread::sleep(Duration::from_millis(100));
    surface.stop_recording()?;
    surface.stop();

    let records = surface.records();
    if let Some(newest) = records.first() {
        let artifact = surface.export_record(newest)?;
        let path = artifact.write_to(&dir.join("exports"))?;
        log::info!("exported {} ({})", path.display(), artifact.mime_type);
    }

    println!("{} records in {}", records.len(), dir.display());
    for record in &records {
        println!("  {:<6} {}  {}", record.media_type.as_str(), record.id, record.timestamp);
    }
    println!("live tracks after stop: {}", host.stats().live_tracks());
    Ok(())
}
