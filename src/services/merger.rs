use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{Component, EffectiveWeights, MergedRecord, Weights},
    services::score_tables::{ComponentTable, ComponentTables},
};

/// Result of merging the four component tables
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Every movie, ordered by rank
    pub records: Vec<MergedRecord>,
    pub weights: EffectiveWeights,
    pub normalized: bool,
    /// Row count of each input table, in `Component::ALL` order
    pub row_counts: Vec<(Component, usize)>,
    pub requested_top_n: i64,
    /// Top-N after clamping to the number of records
    pub top_n: usize,
}

impl MergeOutcome {
    /// The Top-N prefix of the ranking
    pub fn top(&self) -> &[MergedRecord] {
        &self.records[..self.top_n]
    }

    pub fn top_n_clamped(&self) -> bool {
        self.requested_top_n as usize != self.top_n
    }
}

/// Combines component scores into a weighted, ranked composite
pub struct ScoreMerger {
    weights: EffectiveWeights,
    normalize: bool,
}

impl ScoreMerger {
    /// Creates a merger, resolving (and if needed renormalizing) the weights
    pub fn new(weights: Weights, normalize: bool) -> AppResult<Self> {
        Ok(Self {
            weights: weights.resolve()?,
            normalize,
        })
    }

    pub fn weights(&self) -> &EffectiveWeights {
        &self.weights
    }

    /// Joins, validates, scores and ranks the tables
    pub fn merge(&self, tables: &ComponentTables, top_n: i64) -> AppResult<MergeOutcome> {
        if top_n <= 0 {
            return Err(AppError::InvalidTopN(top_n));
        }

        let movie_ids = validate_identifiers(tables)?;
        if !self.normalize {
            for table in tables.iter() {
                validate_score_range(table)?;
            }
        }

        let scales: Vec<ScoreScale> = tables
            .iter()
            .map(|table| {
                if self.normalize {
                    ScoreScale::min_max(table)
                } else {
                    ScoreScale::Identity
                }
            })
            .collect();

        let weights = self.weights.applied.as_array();
        let mut records: Vec<MergedRecord> = movie_ids
            .into_iter()
            .map(|movie_id| {
                let mut scores = [0.0; 4];
                for (i, table) in tables.iter().enumerate() {
                    let raw = table.rows[&movie_id].score;
                    scores[i] = scales[i].apply(raw);
                }
                let final_score: f64 = scores.iter().zip(weights.iter()).map(|(s, w)| s * w).sum();
                let title = tables
                    .iter()
                    .find_map(|table| table.rows[&movie_id].title.clone())
                    .filter(|t| !t.trim().is_empty());

                MergedRecord {
                    rank: 0,
                    movie_id,
                    title,
                    content_score: scores[0],
                    rating_score: scores[1],
                    business_score: scores[2],
                    time_score: scores[3],
                    final_score,
                }
            })
            .collect();

        rank_records(&mut records);

        let effective_top_n = (top_n as usize).min(records.len());
        if effective_top_n != top_n as usize {
            tracing::warn!(
                requested = top_n,
                available = records.len(),
                "Top-N exceeds the number of movies, clamping"
            );
        }

        let row_counts = tables.iter().map(|t| (t.component, t.len())).collect();

        tracing::info!(
            movies = records.len(),
            top_n = effective_top_n,
            renormalized = self.weights.renormalized,
            normalized = self.normalize,
            "Merged component scores"
        );

        Ok(MergeOutcome {
            records,
            weights: self.weights,
            normalized: self.normalize,
            row_counts,
            requested_top_n: top_n,
            top_n: effective_top_n,
        })
    }
}

/// Sorts by descending final score, ties by ascending movie_id, and assigns ranks
pub fn rank_records(records: &mut [MergedRecord]) {
    records.sort_by(compare_for_rank);
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i + 1;
    }
}

fn compare_for_rank(a: &MergedRecord, b: &MergedRecord) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.movie_id.cmp(&b.movie_id))
}

/// Returns the shared movie_id universe, or the first id some table lacks
fn validate_identifiers(tables: &ComponentTables) -> AppResult<BTreeSet<i64>> {
    let universe: BTreeSet<i64> = tables
        .iter()
        .flat_map(|table| table.rows.keys().copied())
        .collect();

    for movie_id in &universe {
        for table in tables.iter() {
            if !table.rows.contains_key(movie_id) {
                return Err(AppError::InconsistentIdentifiers {
                    movie_id: *movie_id,
                    missing_from: table.component,
                    path: table.path.clone(),
                });
            }
        }
    }

    Ok(universe)
}

fn validate_score_range(table: &ComponentTable) -> AppResult<()> {
    for row in table.rows.values() {
        if !row.score.is_finite() || !(0.0..=1.0).contains(&row.score) {
            return Err(AppError::ScoreOutOfRange {
                movie_id: row.movie_id,
                score: row.score,
                path: table.path.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum ScoreScale {
    Identity,
    MinMax { min: f64, range: f64 },
    /// Every row has the same score
    Constant,
}

impl ScoreScale {
    fn min_max(table: &ComponentTable) -> Self {
        let finite = table.rows.values().map(|r| r.score).filter(|s| s.is_finite());
        let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
        if !min.is_finite() || max - min == 0.0 {
            ScoreScale::Constant
        } else {
            ScoreScale::MinMax {
                min,
                range: max - min,
            }
        }
    }

    fn apply(&self, score: f64) -> f64 {
        match self {
            ScoreScale::Identity => score,
            ScoreScale::Constant => 1.0,
            ScoreScale::MinMax { min, range } if score.is_finite() => (score - min) / range,
            ScoreScale::MinMax { .. } => 0.0,
        }
    }
}
