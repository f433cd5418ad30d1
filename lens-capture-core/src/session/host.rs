use std::sync::Arc;

use crate::traits::audio_graph::AudioGraph;
use crate::traits::file_sink::{FileSink, ShareTarget};
use crate::traits::media_encoder::MediaEncoderFactory;

/// Host capabilities a recording session consumes.
#[derive(Clone)]
pub struct RecorderHost {
    pub audio: Arc<dyn AudioGraph>,
    pub encoders: Arc<dyn MediaEncoderFactory>,
    pub sink: Arc<dyn FileSink>,
    /// `None` when the platform has no share sheet.
    pub share: Option<Arc<dyn ShareTarget>>,
}
