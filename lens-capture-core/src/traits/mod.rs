pub mod audio_graph;
pub mod file_sink;
pub mod media_encoder;
pub mod recording_delegate;
pub mod visual_surface;
