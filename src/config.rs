use std::path::PathBuf;

use serde::Deserialize;

use crate::models::Weights;

/// Application configuration loaded from `CINERANK_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the component tables and the ranking outputs
    #[serde(default = "default_tables_dir")]
    pub tables_dir: PathBuf,

    /// Directory for the merge log and the published dataset
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// CSV export of the movie metadata spreadsheet
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,

    /// Published JSON dataset
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Weight overrides; unset components keep their default weight
    pub weight_content: Option<f64>,
    pub weight_rating: Option<f64>,
    pub weight_business: Option<f64>,
    pub weight_time: Option<f64>,

    /// Keywords that mark a movie as restricted for minors, comma separated
    #[serde(default)]
    pub restricted_keywords: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset URL used by the browser
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,

    /// Cards per page in the browser
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables_dir: default_tables_dir(),
            logs_dir: default_logs_dir(),
            metadata_path: default_metadata_path(),
            dataset_path: default_dataset_path(),
            weight_content: None,
            weight_rating: None,
            weight_business: None,
            weight_time: None,
            restricted_keywords: None,
            host: default_host(),
            port: default_port(),
            dataset_url: default_dataset_url(),
            page_size: default_page_size(),
        }
    }
}

fn default_tables_dir() -> PathBuf {
    PathBuf::from("reports/tables")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("reports/logs")
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("data/raw/movies.csv")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("reports/logs/recommendation_data.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dataset_url() -> String {
    "http://127.0.0.1:3000/data/recommendation_data.json".to_string()
}

fn default_page_size() -> usize {
    12
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("CINERANK_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Default weights with the configured overrides applied
    pub fn weights(&self) -> Weights {
        Weights::default().with_overrides(
            self.weight_content,
            self.weight_rating,
            self.weight_business,
            self.weight_time,
        )
    }

    pub fn restricted_keywords(&self) -> Vec<String> {
        self.restricted_keywords
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}
