//! TruthGuard verdict engine.
//!
//! Three evidence providers (AI judgment, fact-check lookup, news
//! corroboration) are queried concurrently and their partial answers are
//! reduced to a single [`models::Verdict`]. A static knowledge base covers
//! the case where no provider answers.

pub mod config;
pub mod db;
pub mod history;
pub mod knowledge;
pub mod models;
pub mod pipeline;
pub mod telemetry;
