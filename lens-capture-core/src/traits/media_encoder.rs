use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::models::error::RecorderError;
use crate::models::media::MediaStream;

/// Notification delivered by a running encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A chunk of encoded output, in capture order. May be empty.
    DataAvailable(Vec<u8>),
    /// A runtime encoder error. The encoder may keep running.
    Error(String),
    /// Finalization complete; no further chunks follow.
    Stopped,
}

/// Options passed when constructing an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    pub mime_type: String,
    pub video_bits_per_second: u32,
}

/// Host capability that constructs encoders for a combined stream.
pub trait MediaEncoderFactory: Send + Sync {
    /// Whether the host can record at all.
    fn is_supported(&self) -> bool;

    /// Whether `mime_type` can be produced.
    fn is_type_supported(&self, mime_type: &str) -> bool;

    fn create(
        &self,
        stream: &MediaStream,
        options: EncoderOptions,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError>;
}

/// A single encoder instance bound to one stream.
pub trait MediaEncoder: Send {
    /// Begin encoding, delivering an event through `events` every `timeslice`.
    fn start(&mut self, timeslice: Duration, events: Sender<EncoderEvent>)
        -> Result<(), RecorderError>;

    /// Request finalization. Pending data is flushed before `EncoderEvent::Stopped`.
    fn stop(&mut self) -> Result<(), RecorderError>;
}
