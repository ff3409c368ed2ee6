use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::Component;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing component score file for {component}: {}", path.display())]
    MissingComponentFile { component: Component, path: PathBuf },

    #[error("Inconsistent identifiers: movie_id {movie_id} is missing from the {missing_from} table ({})", path.display())]
    InconsistentIdentifiers {
        movie_id: i64,
        missing_from: Component,
        path: PathBuf,
    },

    #[error("Duplicate movie_id {movie_id} in {}", path.display())]
    DuplicateIdentifier { movie_id: i64, path: PathBuf },

    #[error("Score {score} for movie_id {movie_id} in {} is outside [0, 1]", path.display())]
    ScoreOutOfRange {
        movie_id: i64,
        score: f64,
        path: PathBuf,
    },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid top_n {0}: must be a positive integer")]
    InvalidTopN(i64),

    #[error("Metadata not found for movie_id {movie_id} in {}", path.display())]
    MetadataNotFound { movie_id: i64, path: PathBuf },

    #[error("Failed to fetch dataset: {0}")]
    DataFetch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::MetadataNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::InvalidTopN(_) | AppError::InvalidWeights(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DataFetch(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_component_message_names_file() {
        let err = AppError::MissingComponentFile {
            component: Component::Rating,
            path: PathBuf::from("reports/tables/02_rating_scores.csv"),
        };
        let message = err.to_string();
        assert!(message.contains("rating"));
        assert!(message.contains("02_rating_scores.csv"));
    }

    #[test]
    fn test_inconsistent_identifiers_message() {
        let err = AppError::InconsistentIdentifiers {
            movie_id: 42,
            missing_from: Component::Time,
            path: PathBuf::from("04_time_scores.csv"),
        };
        assert_eq!(
            err.to_string(),
            "Inconsistent identifiers: movie_id 42 is missing from the time table (04_time_scores.csv)"
        );
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::NotFound("movie 1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::InvalidTopN(0).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
