pub mod artifact;
pub mod error;
pub mod media;
pub mod settings;
pub mod state;
