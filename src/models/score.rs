use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the four independently scored movie dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Content,
    Rating,
    Business,
    Time,
}

impl Component {
    /// All components, in the order their tables are produced
    pub const ALL: [Component; 4] = [
        Component::Content,
        Component::Rating,
        Component::Business,
        Component::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Content => "content",
            Component::Rating => "rating",
            Component::Business => "business",
            Component::Time => "time",
        }
    }

    /// File name of the component table inside the tables directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Component::Content => "01_content_scores.csv",
            Component::Rating => "02_rating_scores.csv",
            Component::Business => "03_business_scores.csv",
            Component::Time => "04_time_scores.csv",
        }
    }

    /// What the component contributes to the final score, for the merge log
    pub fn rationale(&self) -> &'static str {
        match self {
            Component::Content => "keeps recommendations on topic through text and tag similarity",
            Component::Rating => "reflects audience reception through ratings and popularity",
            Component::Business => "accounts for return on investment and studio reach",
            Component::Time => "fits release period, language and runtime",
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single row of a component score table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentScoreRow {
    pub movie_id: i64,
    #[serde(alias = "component_score")]
    pub score: f64,
    #[serde(default)]
    pub title: Option<String>,
}

/// A fully joined and ranked movie, as written to the ranking tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub rank: usize,
    pub movie_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content_score: f64,
    pub rating_score: f64,
    pub business_score: f64,
    pub time_score: f64,
    pub final_score: f64,
}

impl MergedRecord {
    /// Component scores in `Component::ALL` order
    pub fn component_scores(&self) -> [f64; 4] {
        [
            self.content_score,
            self.rating_score,
            self.business_score,
            self.time_score,
        ]
    }
}
