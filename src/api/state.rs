use std::sync::Arc;

use crate::models::PublishedDataset;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<PublishedDataset>,
    /// Cards per page of the preview endpoint
    pub page_size: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PublishedDataset::default(), crate::client::pagination::PAGE_SIZE)
    }
}

impl AppState {
    /// Creates state serving the given published dataset
    pub fn new(dataset: PublishedDataset, page_size: usize) -> Self {
        Self {
            dataset: Arc::new(dataset),
            page_size: page_size.max(1),
        }
    }
}
