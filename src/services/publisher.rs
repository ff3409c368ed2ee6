use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::{DatasetMetadata, LanguageOption, MergedRecord, PublishedDataset, PublishedMovie},
    services::{
        languages::language_label,
        maturity::MaturityPolicy,
        merge_export::read_ranking_csv,
        metadata::MetadataCatalog,
        output::write_atomically,
    },
};

pub const DATASET_FILE: &str = "recommendation_data.json";

/// Joins ranked records with movie metadata into the client dataset
pub struct DatasetPublisher<'a> {
    catalog: &'a MetadataCatalog,
    policy: &'a dyn MaturityPolicy,
    /// Metadata source, named in lookup errors
    metadata_path: PathBuf,
}

impl<'a> DatasetPublisher<'a> {
    pub fn new(
        catalog: &'a MetadataCatalog,
        policy: &'a dyn MaturityPolicy,
        metadata_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            policy,
            metadata_path: metadata_path.into(),
        }
    }

    /// Builds the dataset, failing on the first movie without metadata
    pub fn build(&self, records: &[MergedRecord]) -> AppResult<PublishedDataset> {
        let mut movies = Vec::with_capacity(records.len());
        let mut languages: BTreeMap<String, String> = BTreeMap::new();

        for record in records {
            let metadata =
                self.catalog
                    .get(record.movie_id)
                    .ok_or_else(|| AppError::MetadataNotFound {
                        movie_id: record.movie_id,
                        path: self.metadata_path.clone(),
                    })?;

            let label = language_label(&metadata.language_code);
            if !metadata.language_code.is_empty() {
                languages
                    .entry(metadata.language_code.clone())
                    .or_insert_with(|| label.clone());
            }

            let title = if metadata.title.is_empty() {
                record.title.clone().unwrap_or_default()
            } else {
                metadata.title.clone()
            };

            movies.push(PublishedMovie {
                rank: record.rank,
                movie_id: record.movie_id,
                title,
                overview: metadata.overview.clone(),
                genres: metadata.genres.clone(),
                keywords: metadata.keywords.clone(),
                spoken_languages: metadata.spoken_languages.clone(),
                language_code: metadata.language_code.clone(),
                language_label: label,
                release_date: metadata.release_date.clone(),
                runtime: metadata.runtime,
                vote_average: metadata.vote_average,
                vote_count: metadata.vote_count,
                final_score: record.final_score,
                homepage: metadata.homepage.clone(),
                is_restricted_for_minors: self.policy.is_restricted(metadata),
            });
        }

        movies.sort_by_key(|m| m.rank);

        Ok(PublishedDataset {
            metadata: DatasetMetadata {
                total_movies: movies.len(),
                age_restricted_genres: self.policy.restricted_genres(),
                languages: language_catalogue(languages),
            },
            movies,
        })
    }
}

/// Distinct languages sorted by label, ties by code
fn language_catalogue(languages: BTreeMap<String, String>) -> Vec<LanguageOption> {
    let mut options: Vec<LanguageOption> = languages
        .into_iter()
        .map(|(code, label)| LanguageOption { code, label })
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.code.cmp(&b.code)));
    options
}

pub fn write_dataset(path: &Path, dataset: &PublishedDataset) -> AppResult<()> {
    write_atomically(path, |file| {
        serde_json::to_writer_pretty(file, dataset)?;
        Ok(())
    })
}

pub fn read_dataset(path: &Path) -> AppResult<PublishedDataset> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Full publish step: ranking table + metadata export -> dataset document
pub fn publish(
    ranking_path: &Path,
    metadata_path: &Path,
    output_path: &Path,
    policy: &dyn MaturityPolicy,
) -> AppResult<PublishedDataset> {
    let records = read_ranking_csv(ranking_path)?;
    let catalog = MetadataCatalog::load(metadata_path)?;

    let publisher = DatasetPublisher::new(&catalog, policy, metadata_path);
    let dataset = publisher.build(&records)?;
    write_dataset(output_path, &dataset)?;

    tracing::info!(
        movies = dataset.movies.len(),
        languages = dataset.metadata.languages.len(),
        restricted = dataset.movies.iter().filter(|m| m.is_restricted_for_minors).count(),
        output = %output_path.display(),
        "Published recommendation dataset"
    );

    Ok(dataset)
}
