use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Component, MergedRecord},
    services::{
        merger::MergeOutcome,
        output::{write_atomically, StagedFiles},
    },
};

pub const FULL_RANKING_FILE: &str = "05_final_scores.csv";
pub const TOP_RANKING_FILE: &str = "05_top_recommendations.csv";
pub const MERGE_LOG_FILE: &str = "05_final_merge_log.txt";

/// Paths written by a merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeArtifacts {
    pub full_ranking: PathBuf,
    pub top_ranking: PathBuf,
    pub log: PathBuf,
}

/// Writes both ranking tables and the merge log
///
/// The three files are committed together: if any of them cannot be written,
/// none is replaced.
pub fn export_merge(
    outcome: &MergeOutcome,
    tables_dir: &Path,
    logs_dir: &Path,
) -> AppResult<MergeArtifacts> {
    let artifacts = MergeArtifacts {
        full_ranking: tables_dir.join(FULL_RANKING_FILE),
        top_ranking: tables_dir.join(TOP_RANKING_FILE),
        log: logs_dir.join(MERGE_LOG_FILE),
    };

    let log = render_merge_log(outcome, Utc::now());

    let mut staged = StagedFiles::new();
    staged.stage(&artifacts.full_ranking, |file| {
        write_ranking(file, &artifacts.full_ranking, &outcome.records)
    })?;
    staged.stage(&artifacts.top_ranking, |file| {
        write_ranking(file, &artifacts.top_ranking, outcome.top())
    })?;
    staged.stage(&artifacts.log, |file| {
        file.write_all(log.as_bytes())
            .map_err(|e| AppError::io(&artifacts.log, e))
    })?;
    staged.commit()?;

    tracing::info!(
        full = %artifacts.full_ranking.display(),
        top = %artifacts.top_ranking.display(),
        log = %artifacts.log.display(),
        "Merge results exported"
    );

    Ok(artifacts)
}

pub fn write_ranking_csv(path: &Path, records: &[MergedRecord]) -> AppResult<()> {
    write_atomically(path, |file| write_ranking(file, path, records))
}

fn write_ranking<W: Write>(out: W, path: &Path, records: &[MergedRecord]) -> AppResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| AppError::io(path, e))
}

/// Reads a ranking table back, ordered by rank
pub fn read_ranking_csv(path: &Path) -> AppResult<Vec<MergedRecord>> {
    if !path.is_file() {
        return Err(AppError::NotFound(format!(
            "ranking table {}",
            path.display()
        )));
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = reader
        .deserialize::<MergedRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by_key(|r| r.rank);
    Ok(records)
}

/// Human-readable audit record of a merge run
pub fn render_merge_log(outcome: &MergeOutcome, at: DateTime<Utc>) -> String {
    let weights = &outcome.weights;
    let mut lines = vec![
        format!(
            "[{} UTC] Final score merge executed.",
            at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("Movies ranked: {}", outcome.records.len()),
        "Input rows:".to_string(),
    ];
    for (component, count) in &outcome.row_counts {
        lines.push(format!("  - {}: {}", component, count));
    }

    lines.push(format!(
        "Top-N exported: {} (requested {})",
        outcome.top_n, outcome.requested_top_n
    ));
    lines.push(format!(
        "Component normalization: {}",
        if outcome.normalized { "min-max" } else { "none" }
    ));

    if weights.renormalized {
        lines.push(format!(
            "Weights renormalized: requested sum {:.6}, rescaled to 1.0",
            weights.requested_sum
        ));
    } else {
        lines.push("Weights renormalized: no".to_string());
    }

    lines.push("Weights (requested -> effective):".to_string());
    for component in Component::ALL {
        lines.push(format!(
            "  - {}: {:.6} -> {:.6} ({:.2}%) {}",
            component,
            weights.requested.get(component),
            weights.applied.get(component),
            weights.applied.get(component) * 100.0,
            component.rationale()
        ));
    }

    lines.join("\n") + "\n"
}
