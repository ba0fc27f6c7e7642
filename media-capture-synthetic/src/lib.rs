//! # media-capture-synthetic
//!
//! Software capture host for media-capture-core.
//!
//! Provides:
//! - `SyntheticHost`: test-pattern cameras plus a fake microphone, with a
//!   switchable `HostBehavior` for permission and hardware failures
//! - `SyntheticStream`: live stream rendering an animated test pattern
//! - `SyntheticRecorder`: threaded encoder emitting deterministic chunks
//!
//! Used by the workspace scenario tests and the `capture-studio-demo` binary.
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use media_capture_core::{CaptureSurface, MediaArchive, MemoryStore, StudioConfiguration};
//! use media_capture_synthetic::SyntheticHost;
//!
//! let archive = Arc::new(MediaArchive::open("capturedMedia", Arc::new(MemoryStore::new())));
//! let surface = CaptureSurface::new(Arc::new(SyntheticHost::new()), archive, StudioConfiguration::default());
//! ```

pub mod host;
pub mod recorder;
pub mod stream;

pub use host::{AcquireGate, HostBehavior, HostStats, SyntheticCamera, SyntheticHost};
pub use recorder::SyntheticRecorder;
pub use stream::SyntheticStream;
