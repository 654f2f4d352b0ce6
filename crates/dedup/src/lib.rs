//! `bizscout-dedup` — Multi-provider business listing deduplication.
//!
//! Pure engine crate: receives pre-loaded records, returns merged and scored
//! results. No CLI or file IO.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod merger;
pub mod model;
pub mod normalize;
pub mod opportunity;
pub mod similarity;
pub mod summary;

pub use config::DedupConfig;
pub use engine::run;
pub use error::DedupError;
pub use merger::{merge, Merger};
pub use model::{BusinessRecord, DedupInput, DedupResult, MergedRecord, SourceRecords};
pub use similarity::{similarity, Similarity, WeightedSimilarity};
