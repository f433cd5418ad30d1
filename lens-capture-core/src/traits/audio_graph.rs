use crate::models::error::RecorderError;
use crate::models::media::{AudioNodeRef, ContextId, MediaStream, StreamDestination};

/// The host audio subsystem: contexts, nodes, and node wiring.
///
/// The lens renderer builds its own graph through this interface. Wrapping an
/// implementation in [`crate::monitor::MonitoredAudioGraph`] exposes the
/// lens audio for recording without touching the renderer.
pub trait AudioGraph: Send + Sync {
    /// Create a new audio context.
    fn create_context(&self) -> Result<ContextId, RecorderError>;

    /// The terminal output node of `context`.
    fn destination(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError>;

    /// Create a generic processing node (gain, oscillator, ...) in `context`.
    fn create_processing_node(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError>;

    /// Create a node in `context` that plays `stream`'s audio.
    fn create_stream_source(
        &self,
        context: ContextId,
        stream: &MediaStream,
    ) -> Result<AudioNodeRef, RecorderError>;

    /// Create a node in `context` whose input is exposed as a live stream.
    fn create_stream_destination(&self, context: ContextId)
        -> Result<StreamDestination, RecorderError>;

    /// Connect `source` to the downstream node `destination`.
    fn connect(&self, source: AudioNodeRef, destination: AudioNodeRef) -> Result<(), RecorderError>;
}
