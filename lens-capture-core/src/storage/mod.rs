pub mod recording_store;

pub use recording_store::{RecordingStore, StoredRecording};
