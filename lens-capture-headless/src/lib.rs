//! # lens-capture-headless
//!
//! In-process host backend for lens-capture-kit.
//!
//! Provides:
//! - `HeadlessAudioGraph`: audio graph that records contexts, nodes and wiring
//! - `CanvasSurface` / `acquire_user_media`: synthetic capture surface and camera
//! - `TimedEncoderFactory`: encoder that emits one chunk per timeslice
//! - `DirectorySink` / `OutboxShareTarget` / `LogNotifier`: file and alert surfaces
//! - `SimulatedLens`: builds lens-style audio wiring for the monitor to discover
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use lens_capture_core::{MonitoredAudioGraph, RecorderHost};
//! use lens_capture_headless::{DirectorySink, HeadlessAudioGraph, TimedEncoderFactory};
//!
//! let graph = Arc::new(MonitoredAudioGraph::new(HeadlessAudioGraph::new()));
//! let host = RecorderHost {
//!     audio: graph.clone(),
//!     encoders: Arc::new(TimedEncoderFactory::default()),
//!     sink: Arc::new(DirectorySink::new("recordings")),
//!     share: None,
//! };
//! ```

pub mod audio_graph;
pub mod lens;
pub mod media_devices;
pub mod sinks;
pub mod timed_encoder;

pub use audio_graph::HeadlessAudioGraph;
pub use lens::SimulatedLens;
pub use media_devices::{acquire_user_media, CanvasSurface};
pub use sinks::{DirectorySink, LogNotifier, OutboxShareTarget};
pub use timed_encoder::{TimedEncoder, TimedEncoderFactory};

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use lens_capture_core::{
        MonitoredAudioGraph, RecordController, RecorderHost, RecorderSettings, RecordingState,
        ToggleOutcome,
    };

    use super::*;

    #[test]
    fn records_lens_and_microphone_to_disk() {
        let dir = std::env::temp_dir().join(format!("lens_capture_e2e_{}", uuid::Uuid::new_v4()));
        let graph = Arc::new(MonitoredAudioGraph::new(HeadlessAudioGraph::new()));
        SimulatedLens::apply(graph.as_ref(), 2).unwrap();

        let sink = DirectorySink::new(&dir);
        let host = RecorderHost {
            audio: graph.clone(),
            encoders: Arc::new(TimedEncoderFactory::default()),
            sink: Arc::new(sink.clone()),
            share: None,
        };
        let settings = RecorderSettings {
            chunk_interval_ms: 20,
            output_file_name: "e2e.webm".into(),
            ..Default::default()
        };
        let mut controller = RecordController::new(
            host,
            Arc::new(CanvasSurface::new(640, 480)),
            graph.registry(),
            settings,
            Arc::new(LogNotifier),
        );
        controller.set_microphone(acquire_user_media(true, true).unwrap());

        // One lens tap plus the microphone.
        assert_eq!(controller.audio_sources().len(), 2);

        assert_eq!(controller.toggle(), Ok(ToggleOutcome::Started));
        thread::sleep(Duration::from_millis(80));
        assert_eq!(
            controller.toggle(),
            Ok(ToggleOutcome::Saved("e2e.webm".into()))
        );
        assert_eq!(controller.state(), RecordingState::Stopped);

        let session = controller.session().unwrap();
        assert_eq!(session.mime_type(), Some("video/webm;codecs=vp8"));
        let artifact = session.artifact().unwrap();
        let saved = fs::read(sink.path_for("e2e.webm")).unwrap();
        assert_eq!(saved, artifact.to_bytes());
        assert_eq!(&saved[0..4], timed_encoder::CONTAINER_MAGIC);

        let metadata = sink.metadata_for("e2e.webm").unwrap();
        assert_eq!(&metadata, artifact.metadata());
        assert_eq!(metadata.size_bytes, saved.len() as u64);

        fs::remove_dir_all(&dir).ok();
    }
}
