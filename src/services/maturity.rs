use std::collections::BTreeSet;

use crate::models::MovieMetadata;

/// Genres that are typically unsuitable for minors
pub const AGE_RESTRICTED_GENRES: &[&str] = &["Crime", "Horror", "Mystery", "Thriller", "War"];

/// Decides whether a movie is hidden from viewers under the adult age
///
/// The rule itself is a business decision owned outside the publisher, so it
/// sits behind a trait and the publisher only consumes the verdict.
pub trait MaturityPolicy: Send + Sync {
    fn is_restricted(&self, movie: &MovieMetadata) -> bool;

    /// Genres the policy treats as restricted, for the dataset metadata
    fn restricted_genres(&self) -> Vec<String>;
}

/// Flags movies by genre name or keyword, case-insensitively
#[derive(Debug, Clone)]
pub struct GenreKeywordPolicy {
    genres: BTreeSet<String>,
    keywords: BTreeSet<String>,
}

impl Default for GenreKeywordPolicy {
    fn default() -> Self {
        Self::new(AGE_RESTRICTED_GENRES.iter().copied(), std::iter::empty::<&str>())
    }
}

impl GenreKeywordPolicy {
    pub fn new<G, K>(genres: G, keywords: K) -> Self
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            genres: normalized_set(genres),
            keywords: normalized_set(keywords),
        }
    }

    /// Default genres plus the given restricted keywords
    pub fn with_keywords<K>(keywords: K) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self::new(AGE_RESTRICTED_GENRES.iter().copied(), keywords)
    }
}

impl MaturityPolicy for GenreKeywordPolicy {
    fn is_restricted(&self, movie: &MovieMetadata) -> bool {
        movie
            .genres
            .iter()
            .any(|g| self.genres.contains(&g.trim().to_lowercase()))
            || movie
                .keywords
                .iter()
                .any(|k| self.keywords.contains(&k.trim().to_lowercase()))
    }

    fn restricted_genres(&self) -> Vec<String> {
        AGE_RESTRICTED_GENRES
            .iter()
            .filter(|g| self.genres.contains(&g.to_lowercase()))
            .map(|g| g.to_string())
            .chain(
                self.genres
                    .iter()
                    .filter(|g| !AGE_RESTRICTED_GENRES.iter().any(|d| d.eq_ignore_ascii_case(g)))
                    .cloned(),
            )
            .collect()
    }
}

fn normalized_set<I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}
