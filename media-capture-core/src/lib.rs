//! # media-capture-core
//!
//! Platform-agnostic media capture core library.
//!
//! Provides device selection, live stream lifecycle, the adjustment/filter
//! pipeline, photo and recording capture, and the local media archive.
//! Host platforms (browser media APIs, native camera stacks, the synthetic
//! test host) implement the `CaptureHost` trait and plug into the generic
//! `CaptureSurface`.
//!
//! ## Architecture
//!
//! ```text
//! media-capture-core (this crate)
//! ├── traits/       ← CaptureHost, MediaStream, MediaEncoder, SurfaceDelegate, DurableStore
//! ├── models/       ← errors, StreamState, RecordingState, StreamConfig, MediaRecord, AdjustmentState
//! ├── processing/   ← filter pipeline, PNG/thumbnail encoding, ChunkBuffer
//! ├── session/      ← DeviceRegistry, StreamSession, CaptureEngine, CaptureSurface
//! └── storage/      ← MediaArchive, FileStore/MemoryStore, export
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::adjustment::{AdjustmentState, FilterOp, StyleFilter};
pub use models::capture_result::CaptureResult;
pub use models::config::{
    CaptureMode, MediaConstraints, Resolution, StreamConfig, StudioConfiguration, VideoConstraints, FRAME_RATE_PRESETS,
};
pub use models::device::{CaptureDevice, DeviceDescriptor, DeviceKind, TrackInfo, TrackKind};
pub use models::error::{AcquisitionError, CaptureError, ExportError, PersistenceError, StudioError};
pub use models::media_record::{MediaPayload, MediaRecord, MediaType};
pub use models::state::{RecordingState, StreamState};
pub use processing::chunk_buffer::ChunkBuffer;
pub use session::capture_engine::CaptureEngine;
pub use session::device_registry::DeviceRegistry;
pub use session::stream::{StreamInfo, StreamSession};
pub use session::surface::CaptureSurface;
pub use storage::archive::MediaArchive;
pub use storage::export::ExportedArtifact;
pub use storage::store::{FileStore, MemoryStore};
pub use traits::capture_host::CaptureHost;
pub use traits::durable_store::DurableStore;
pub use traits::media_encoder::{ChunkCallback, MediaEncoder};
pub use traits::media_stream::MediaStream;
pub use traits::surface_delegate::SurfaceDelegate;
