//! # lens-capture-core
//!
//! Platform-agnostic core for recording an AR lens preview.
//!
//! Captures a rendered surface, mixes microphone and lens-internal audio
//! into a single track, records the combined stream in chunks, and turns
//! the result into a downloadable or shareable file. Host backends (a
//! browser, the headless backend) implement the capability traits and
//! plug into [`RecordingSession`].
//!
//! ## Architecture
//!
//! ```text
//! lens-capture-core (this crate)
//! ├── traits/   ← VisualSurface, AudioGraph, MediaEncoderFactory, FileSink, ShareTarget, ...
//! ├── models/   ← RecorderError, RecordingState, RecorderSettings, MediaStream, OutputArtifact
//! ├── monitor/  ← MonitoredAudioGraph (audio tap decorator), TapRegistry
//! ├── session/  ← RecordingSession, RecordController, codec negotiation
//! └── storage/  ← recording directory with metadata sidecars
//! ```

pub mod models;
pub mod monitor;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use models::artifact::{ArtifactFile, ArtifactMetadata, OutputArtifact, ShareData};
pub use models::error::RecorderError;
pub use models::media::{
    AudioNodeRef, ContextId, MediaStream, MediaTrack, NodeKind, StreamDestination, TrackKind,
};
pub use models::settings::RecorderSettings;
pub use models::state::RecordingState;
pub use monitor::{AudioTap, MonitoredAudioGraph, TapRegistry};
pub use session::controller::{RecordController, ToggleOutcome};
pub use session::host::RecorderHost;
pub use session::recording::{RecordingSession, ShareOutcome};
pub use storage::{RecordingStore, StoredRecording};
pub use traits::audio_graph::AudioGraph;
pub use traits::file_sink::{FileSink, ShareTarget, UserNotifier};
pub use traits::media_encoder::{EncoderEvent, EncoderOptions, MediaEncoder, MediaEncoderFactory};
pub use traits::recording_delegate::RecordingDelegate;
pub use traits::visual_surface::VisualSurface;
