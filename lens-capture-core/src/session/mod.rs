pub mod controller;
pub mod format;
pub mod host;
pub mod recording;
