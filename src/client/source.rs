use std::path::PathBuf;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::PublishedDataset,
};

/// Where the client loads the published dataset from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads the whole dataset document in one request
    async fn fetch(&self) -> AppResult<PublishedDataset>;

    /// Source location for logging and messages
    fn describe(&self) -> String;
}

/// Fetches the dataset with a single GET request
#[derive(Clone)]
pub struct HttpDatasetSource {
    http_client: HttpClient,
    url: String,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> AppResult<PublishedDataset> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::DataFetch(format!("GET {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::DataFetch(format!(
                "GET {} returned status {}",
                self.url,
                response.status()
            )));
        }

        response
            .json::<PublishedDataset>()
            .await
            .map_err(|e| AppError::DataFetch(format!("invalid dataset from {}: {}", self.url, e)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the dataset from a local file
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self) -> AppResult<PublishedDataset> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::DataFetch(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::DataFetch(format!("invalid dataset in {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_reads_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"metadata": {"languages": []}, "movies": []}"#).unwrap();

        let dataset = FileDatasetSource::new(&path).fetch().await.unwrap();
        assert!(dataset.movies.is_empty());
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileDatasetSource::new("/nonexistent/data.json");
        let err = tokio_test::block_on(source.fetch()).unwrap_err();
        assert!(matches!(err, AppError::DataFetch(_)));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileDatasetSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, AppError::DataFetch(_)));
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        // Port 9 (discard) is not served locally
        let source = HttpDatasetSource::new("http://127.0.0.1:9/data.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::DataFetch(_)));
    }

    /// Serves the published dataset on an ephemeral local port
    async fn spawn_server(dataset: PublishedDataset) -> String {
        let app = crate::api::create_router(crate::api::AppState::new(dataset, 12));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_source_fetches_dataset() {
        let dataset = PublishedDataset {
            movies: vec![crate::models::sample_movie(7, "Heat")],
            ..Default::default()
        };
        let base = spawn_server(dataset.clone()).await;

        let source = HttpDatasetSource::new(format!("{}/data/recommendation_data.json", base));
        assert_eq!(source.fetch().await.unwrap(), dataset);
    }

    #[tokio::test]
    async fn test_http_source_rejects_error_status() {
        let base = spawn_server(PublishedDataset::default()).await;

        let source = HttpDatasetSource::new(format!("{}/data/missing.json", base));
        let err = source.fetch().await.unwrap_err();
        match err {
            AppError::DataFetch(message) => assert!(message.contains("404")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
