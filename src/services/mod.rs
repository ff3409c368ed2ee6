pub mod languages;
pub mod maturity;
pub mod merge_export;
pub mod merger;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod publisher;
pub mod score_tables;

pub use maturity::{GenreKeywordPolicy, MaturityPolicy};
pub use merger::{MergeOutcome, ScoreMerger};
pub use pipeline::{run_merge, run_publish, MergeRequest};
