pub mod api;
pub mod engine;
pub mod index;

pub use api::{HistoryQuery, HistoryStore, OpLog};
pub use engine::{read_log, HistoryEngine};
pub use index::{HistoryIndex, InMemoryHistory};
