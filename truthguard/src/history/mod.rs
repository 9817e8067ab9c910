pub mod stats;

pub use stats::{compile, HistoryStats, SourceCount, TimelineItem};
