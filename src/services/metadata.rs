use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::MovieMetadata,
    services::languages::clean_spoken_languages,
};

/// Row of the movie metadata export (TMDB column layout)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieRow {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub spoken_languages: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub vote_average: Option<String>,
    #[serde(default)]
    pub vote_count: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl From<RawMovieRow> for MovieMetadata {
    fn from(row: RawMovieRow) -> Self {
        let raw_spoken = parse_name_list(row.spoken_languages.as_deref().unwrap_or_default());

        MovieMetadata {
            movie_id: row.id,
            title: clean_text(row.title),
            overview: clean_text(row.overview),
            genres: parse_name_list(row.genres.as_deref().unwrap_or_default()),
            keywords: parse_name_list(row.keywords.as_deref().unwrap_or_default()),
            language_code: clean_text(row.original_language).to_uppercase(),
            spoken_languages: clean_spoken_languages(raw_spoken),
            release_date: date_part(row.release_date.as_deref().unwrap_or_default()),
            runtime: parse_number(row.runtime.as_deref()).map(|v| v.round() as i64),
            vote_average: parse_number(row.vote_average.as_deref()),
            vote_count: parse_number(row.vote_count.as_deref()).map(|v| v.round() as i64),
            homepage: Some(clean_text(row.homepage)).filter(|h| !h.is_empty()),
        }
    }
}

/// Metadata of every movie in the source, keyed by movie_id
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    movies: HashMap<i64, MovieMetadata>,
}

impl MetadataCatalog {
    pub fn new(movies: impl IntoIterator<Item = MovieMetadata>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.movie_id, m)).collect(),
        }
    }

    /// Loads the metadata CSV export
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "movie metadata {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let mut movies = HashMap::new();
        for row in reader.deserialize::<RawMovieRow>() {
            let metadata = MovieMetadata::from(row?);
            // First occurrence wins, the export occasionally repeats a movie
            movies.entry(metadata.movie_id).or_insert(metadata);
        }

        tracing::info!(
            path = %path.display(),
            movies = movies.len(),
            "Loaded movie metadata"
        );

        Ok(Self { movies })
    }

    pub fn get(&self, movie_id: i64) -> Option<&MovieMetadata> {
        self.movies.get(&movie_id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

fn name_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"['"]name['"]\s*:\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#)
            .expect("valid name field regex")
    })
}

fn quoted_string_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).expect("valid quoted string regex")
    })
}

/// Parses a list cell: `[{'id': 1, 'name': 'Drama'}]`, `['a', 'b']` or `a, b`
pub fn parse_name_list(value: &str) -> Vec<String> {
    let text = value.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.starts_with('[') {
        // Lists of objects carry their value under "name", plain lists are quoted strings
        if text.contains('{') {
            return capture_strings(name_field_regex(), text);
        }
        return capture_strings(quoted_string_regex(), text);
    }

    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn capture_strings(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| unescape(m.as_str()).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn clean_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn date_part(value: &str) -> String {
    value
        .trim()
        .split([' ', 'T'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
