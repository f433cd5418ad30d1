pub mod monitored_graph;
pub mod tap_registry;

pub use monitored_graph::MonitoredAudioGraph;
pub use tap_registry::{AudioTap, TapRegistry};
