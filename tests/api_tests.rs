use axum_test::TestServer;
use serde_json::Value;

use cinerank::api::{create_router, AppState};
use cinerank::models::{DatasetMetadata, LanguageOption, PublishedDataset, PublishedMovie};

fn movie(rank: usize, movie_id: i64, title: &str, language: &str, label: &str) -> PublishedMovie {
    PublishedMovie {
        rank,
        movie_id,
        title: title.to_string(),
        overview: String::new(),
        genres: vec!["Drama".to_string()],
        keywords: vec![],
        spoken_languages: vec![label.to_string()],
        language_code: language.to_string(),
        language_label: label.to_string(),
        release_date: "2001-01-01".to_string(),
        runtime: Some(100),
        vote_average: Some(7.0),
        vote_count: Some(500),
        final_score: 1.0 - rank as f64 / 100.0,
        homepage: None,
        is_restricted_for_minors: false,
    }
}

/// Movie A restricted, B in French, C about a heist
fn three_movie_dataset() -> PublishedDataset {
    let mut a = movie(1, 10, "Alpha", "EN", "English");
    a.genres = vec!["Horror".to_string()];
    a.is_restricted_for_minors = true;
    let b = movie(2, 20, "Bravo", "FR", "French");
    let mut c = movie(3, 30, "Charlie", "EN", "English");
    c.keywords = vec!["heist".to_string()];

    PublishedDataset {
        metadata: DatasetMetadata {
            total_movies: 3,
            age_restricted_genres: vec!["Horror".to_string()],
            languages: vec![
                LanguageOption {
                    code: "EN".to_string(),
                    label: "English".to_string(),
                },
                LanguageOption {
                    code: "FR".to_string(),
                    label: "French".to_string(),
                },
            ],
        },
        movies: vec![a, b, c],
    }
}

fn create_test_server(dataset: PublishedDataset) -> TestServer {
    let app = create_router(AppState::new(dataset, 12));
    TestServer::new(app).unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(PublishedDataset::default());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_dataset_document_is_served() {
    let server = create_test_server(three_movie_dataset());

    let response = server.get("/data/recommendation_data.json").await;
    response.assert_status_ok();

    let dataset: PublishedDataset = response.json();
    assert_eq!(dataset, three_movie_dataset());
}

#[tokio::test]
async fn test_languages() {
    let server = create_test_server(three_movie_dataset());

    let response = server.get("/api/v1/languages").await;
    response.assert_status_ok();
    let languages: Vec<LanguageOption> = response.json();
    assert_eq!(
        languages.iter().map(|l| l.code.as_str()).collect::<Vec<_>>(),
        vec!["EN", "FR"]
    );
}

#[tokio::test]
async fn test_movies_default_filter_shows_everything() {
    let server = create_test_server(three_movie_dataset());

    let response = server.get("/api/v1/movies").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["result_count"], 3);
    assert_eq!(titles(&body), vec!["Alpha", "Bravo", "Charlie"]);
}

#[tokio::test]
async fn test_movies_filters() {
    let server = create_test_server(three_movie_dataset());

    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("min_age", 15)
        .await
        .json();
    assert_eq!(titles(&body), vec!["Bravo", "Charlie"]);

    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("language", "fr")
        .await
        .json();
    assert_eq!(titles(&body), vec!["Bravo"]);

    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("q", "HEIST")
        .await
        .json();
    assert_eq!(titles(&body), vec!["Charlie"]);

    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("min_age", 15)
        .add_query_param("language", "fr")
        .add_query_param("q", "heist")
        .await
        .json();
    assert_eq!(body["result_count"], 0);
    assert_eq!(body["total_pages"], 0);
    assert!(titles(&body).is_empty());
}

#[tokio::test]
async fn test_movies_pagination() {
    let movies = (1..=25)
        .map(|i| movie(i, i as i64, &format!("Movie {i}"), "EN", "English"))
        .collect();
    let server = create_test_server(PublishedDataset {
        metadata: DatasetMetadata::default(),
        movies,
    });

    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("page", 3)
        .await
        .json();
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["has_next"], false);
    assert_eq!(titles(&body), vec!["Movie 25"]);

    // Out of range pages clamp to the last page
    let body: Value = server
        .get("/api/v1/movies")
        .add_query_param("page", 40)
        .await
        .json();
    assert_eq!(body["page"], 3);
}

#[tokio::test]
async fn test_get_movie() {
    let server = create_test_server(three_movie_dataset());

    let response = server.get("/api/v1/movies/20").await;
    response.assert_status_ok();
    let movie: PublishedMovie = response.json();
    assert_eq!(movie.title, "Bravo");
    assert_eq!(movie.language_code, "FR");

    let response = server.get("/api/v1/movies/999").await;
    response.assert_status_not_found();
}
