mod filter;
mod movie;
mod score;
mod weights;

pub use filter::{normalize_keyword, normalize_language, FilterState, ADULT_AGE};
pub use movie::{DatasetMetadata, LanguageOption, MovieMetadata, PublishedDataset, PublishedMovie};
pub use score::{Component, ComponentScoreRow, MergedRecord};
pub use weights::{EffectiveWeights, Weights, WEIGHT_TOLERANCE};

#[cfg(test)]
pub(crate) use movie::sample_movie;
