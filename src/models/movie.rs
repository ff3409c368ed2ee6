use serde::{Deserialize, Serialize};

/// Descriptive metadata of a movie, cleaned from the metadata source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieMetadata {
    pub movie_id: i64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Upper-cased original language code (e.g. "EN")
    pub language_code: String,
    pub spoken_languages: Vec<String>,
    /// Date part only, `YYYY-MM-DD` when known, empty otherwise
    pub release_date: String,
    pub runtime: Option<i64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub homepage: Option<String>,
}

/// A ranked movie joined with its metadata, as consumed by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedMovie {
    pub rank: usize,
    pub movie_id: i64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub language_code: String,
    pub language_label: String,
    pub release_date: String,
    pub runtime: Option<i64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub final_score: f64,
    pub homepage: Option<String>,
    pub is_restricted_for_minors: bool,
}

impl PublishedMovie {
    /// Release year, when the release date carries one
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .get(..4)
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Entry of the language selector catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default)]
    pub total_movies: usize,
    #[serde(default)]
    pub age_restricted_genres: Vec<String>,
    pub languages: Vec<LanguageOption>,
}

/// The single JSON document produced by the publisher
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PublishedDataset {
    pub metadata: DatasetMetadata,
    pub movies: Vec<PublishedMovie>,
}

#[cfg(test)]
pub(crate) fn sample_movie(movie_id: i64, title: &str) -> PublishedMovie {
    PublishedMovie {
        rank: movie_id as usize,
        movie_id,
        title: title.to_string(),
        overview: String::new(),
        genres: vec![],
        keywords: vec![],
        spoken_languages: vec![],
        language_code: "EN".to_string(),
        language_label: "English".to_string(),
        release_date: "1999-03-31".to_string(),
        runtime: Some(136),
        vote_average: Some(7.9),
        vote_count: Some(1200),
        final_score: 0.5,
        homepage: None,
        is_restricted_for_minors: false,
    }
}
