use std::path::{Path, PathBuf};

use crate::{
    error::AppResult,
    models::{PublishedDataset, Weights},
    services::{
        maturity::MaturityPolicy,
        merge_export::{export_merge, MergeArtifacts, FULL_RANKING_FILE},
        merger::{MergeOutcome, ScoreMerger},
        publisher,
        score_tables::load_component_tables,
    },
};

/// Inputs of one merge run
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub tables_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub weights: Weights,
    pub normalize: bool,
    pub top_n: i64,
}

/// Loads, validates, merges and exports the component tables
///
/// Nothing is written unless every table was found and validated.
pub fn run_merge(request: &MergeRequest) -> AppResult<(MergeOutcome, MergeArtifacts)> {
    tracing::info!(
        tables_dir = %request.tables_dir.display(),
        top_n = request.top_n,
        normalize = request.normalize,
        "Starting score merge"
    );

    let merger = ScoreMerger::new(request.weights, request.normalize)?;
    let effective = merger.weights();
    if effective.renormalized {
        tracing::warn!(
            requested_sum = effective.requested_sum,
            content = effective.applied.content,
            rating = effective.applied.rating,
            business = effective.applied.business,
            time = effective.applied.time,
            "Weights did not sum to 1.0, renormalized"
        );
    }

    let tables = load_component_tables(&request.tables_dir)?;
    for table in tables.iter() {
        tracing::info!(
            component = %table.component,
            rows = table.len(),
            "Component table loaded"
        );
    }

    let outcome = merger.merge(&tables, request.top_n)?;
    let artifacts = export_merge(&outcome, &request.tables_dir, &request.logs_dir)?;
    Ok((outcome, artifacts))
}

/// Publishes the dataset from the full ranking in `tables_dir`
pub fn run_publish(
    tables_dir: &Path,
    metadata_path: &Path,
    output_path: &Path,
    policy: &dyn MaturityPolicy,
) -> AppResult<PublishedDataset> {
    publisher::publish(
        &tables_dir.join(FULL_RANKING_FILE),
        metadata_path,
        output_path,
        policy,
    )
}
