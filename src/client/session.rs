use crate::{
    client::{
        filter::apply_filter,
        pagination::{calculate_pagination, compute_page, Pagination, PAGE_SIZE},
        source::DatasetSource,
    },
    models::{normalize_keyword, normalize_language, FilterState, LanguageOption, PublishedDataset, PublishedMovie},
};

pub const EMPTY_RESULTS_MESSAGE: &str = "No movies match the current filters.";
pub const LOADING_MESSAGE: &str = "Loading recommendations...";

/// Load status of the session's dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Ready,
    /// The single fetch failed; the session stays empty
    Failed(String),
}

/// One browsing session: the loaded movies plus the current filter and page
#[derive(Debug, Clone)]
pub struct Session {
    movies: Vec<PublishedMovie>,
    languages: Vec<LanguageOption>,
    filter: FilterState,
    page: usize,
    page_size: usize,
    state: LoadState,
}

/// Everything needed to render the current page
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub movies: Vec<&'a PublishedMovie>,
    pub pagination: Pagination,
    pub result_count: usize,
    /// Shown in place of the cards when there is nothing to list
    pub message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Session {
    pub fn new(page_size: usize) -> Self {
        Self {
            movies: Vec::new(),
            languages: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::NotLoaded,
        }
    }

    pub fn with_dataset(dataset: PublishedDataset, page_size: usize) -> Self {
        let mut session = Self::new(page_size);
        session.set_dataset(dataset);
        session
    }

    /// Loads the dataset and applies the starting filter and page
    ///
    /// Infallible: a failed fetch yields a session in the `Failed` state that
    /// renders as the empty state.
    pub async fn open(
        source: &dyn DatasetSource,
        page_size: usize,
        filter: FilterState,
        page: usize,
    ) -> Self {
        let mut session = Self::new(page_size);
        session.load(source).await;
        session.set_filter(filter);
        session.go_to_page(page);
        session
    }

    /// Fetches the dataset once; a failure leaves an empty session, never an error
    pub async fn load(&mut self, source: &dyn DatasetSource) -> &LoadState {
        match source.fetch().await {
            Ok(dataset) => {
                tracing::info!(
                    source = %source.describe(),
                    movies = dataset.movies.len(),
                    "Dataset loaded"
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "Dataset fetch failed");
                self.movies.clear();
                self.languages.clear();
                self.page = 1;
                self.state = LoadState::Failed(e.to_string());
            }
        }
        &self.state
    }

    fn set_dataset(&mut self, dataset: PublishedDataset) {
        let mut movies = dataset.movies;
        movies.sort_by_key(|m| m.rank);
        self.movies = movies;
        self.languages = dataset.metadata.languages;
        self.page = 1;
        self.state = LoadState::Ready;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn languages(&self) -> &[LanguageOption] {
        &self.languages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the whole filter and returns to the first page
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn set_min_age(&mut self, min_age: u32) {
        self.filter.min_age = min_age;
        self.page = 1;
    }

    pub fn set_language(&mut self, language: Option<&str>) {
        self.filter.language_code = normalize_language(language);
        self.page = 1;
    }

    pub fn set_keyword(&mut self, keyword: Option<&str>) {
        self.filter.keyword = normalize_keyword(keyword);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(FilterState::default());
    }

    pub fn filtered(&self) -> Vec<&PublishedMovie> {
        apply_filter(&self.movies, &self.filter)
    }

    pub fn result_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn pagination(&self) -> Pagination {
        calculate_pagination(self.result_count(), self.page_size, self.page)
    }

    /// Moves to the given page, clamped into range
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = compute_page(self.result_count(), self.page_size, page);
        self.page
    }

    /// Advances one page; returns false (no-op) on the last page
    pub fn next_page(&mut self) -> bool {
        let pagination = self.pagination();
        if !pagination.has_next {
            return false;
        }
        self.page = pagination.page + 1;
        true
    }

    /// Goes back one page; returns false (no-op) on the first page
    pub fn prev_page(&mut self) -> bool {
        let pagination = self.pagination();
        if !pagination.has_prev {
            return false;
        }
        self.page = pagination.page - 1;
        true
    }

    /// Current page of filtered movies
    pub fn view(&self) -> PageView<'_> {
        let filtered = self.filtered();
        let result_count = filtered.len();
        let pagination = calculate_pagination(result_count, self.page_size, self.page);

        let message = match &self.state {
            LoadState::NotLoaded => Some(LOADING_MESSAGE.to_string()),
            LoadState::Failed(reason) => Some(format!("Could not load recommendations: {reason}")),
            LoadState::Ready if result_count == 0 => Some(EMPTY_RESULTS_MESSAGE.to_string()),
            LoadState::Ready => None,
        };

        let movies = filtered
            .into_iter()
            .skip(pagination.offset)
            .take(self.page_size)
            .collect();

        PageView {
            movies,
            pagination,
            result_count,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::source::MockDatasetSource;
    use crate::error::AppError;
    use crate::models::{sample_movie, DatasetMetadata};

    fn dataset(count: i64) -> PublishedDataset {
        PublishedDataset {
            metadata: DatasetMetadata::default(),
            movies: (1..=count).map(|id| sample_movie(id, &format!("Movie {id}"))).collect(),
        }
    }

    fn three_movies() -> PublishedDataset {
        let mut a = sample_movie(1, "A");
        a.is_restricted_for_minors = true;
        let mut b = sample_movie(2, "B");
        b.language_code = "fr".to_string();
        let mut c = sample_movie(3, "C");
        c.overview = "an elaborate heist".to_string();
        PublishedDataset {
            metadata: DatasetMetadata::default(),
            movies: vec![a, b, c],
        }
    }

    fn ids(view: &PageView<'_>) -> Vec<i64> {
        view.movies.iter().map(|m| m.movie_id).collect()
    }

    #[test]
    fn test_three_movie_filter_example() {
        let mut session = Session::with_dataset(three_movies(), PAGE_SIZE);

        session.set_min_age(15);
        assert_eq!(ids(&session.view()), vec![2, 3]);

        session.clear_filters();
        session.set_language(Some("fr"));
        assert_eq!(ids(&session.view()), vec![2]);

        session.clear_filters();
        session.set_keyword(Some("heist"));
        assert_eq!(ids(&session.view()), vec![3]);

        session.set_min_age(15);
        session.set_language(Some("fr"));
        let view = session.view();
        assert!(view.movies.is_empty());
        assert_eq!(view.result_count, 0);
        assert_eq!(view.message.as_deref(), Some(EMPTY_RESULTS_MESSAGE));
    }

    #[test]
    fn test_pagination_example() {
        let mut session = Session::with_dataset(dataset(25), 12);
        assert_eq!(session.pagination().total_pages, 3);

        assert!(session.next_page());
        assert!(session.next_page());
        let view = session.view();
        assert_eq!(view.pagination.page, 3);
        assert_eq!(ids(&view), vec![25]);

        assert!(!session.next_page());
        assert_eq!(session.pagination().page, 3);
    }

    #[test]
    fn test_prev_on_first_page_is_noop() {
        let mut session = Session::with_dataset(dataset(5), 12);
        assert!(!session.prev_page());
        assert_eq!(session.pagination().page, 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = Session::with_dataset(dataset(30), 12);
        session.go_to_page(3);
        assert_eq!(session.pagination().page, 3);

        session.set_keyword(Some("movie"));
        assert_eq!(session.pagination().page, 1);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut session = Session::with_dataset(dataset(25), 12);
        assert_eq!(session.go_to_page(40), 3);
        assert_eq!(session.go_to_page(0), 1);
    }

    #[test]
    fn test_view_is_idempotent() {
        let mut session = Session::with_dataset(dataset(25), 12);
        session.next_page();
        assert_eq!(session.view(), session.view());
    }

    #[test]
    fn test_unloaded_session_shows_loading() {
        let session = Session::default();
        let view = session.view();
        assert_eq!(view.result_count, 0);
        assert_eq!(view.message.as_deref(), Some(LOADING_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let mut source = MockDatasetSource::new();
        source.expect_fetch().times(1).returning(|| Ok(three_movies()));
        source.expect_describe().returning(|| "mock".to_string());

        let mut session = Session::default();
        assert_eq!(session.load(&source).await, &LoadState::Ready);
        assert_eq!(session.result_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty_state() {
        let mut source = MockDatasetSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|| Err(AppError::DataFetch("connection refused".to_string())));
        source.expect_describe().returning(|| "mock".to_string());

        let mut session = Session::with_dataset(dataset(4), 12);
        let state = session.load(&source).await.clone();

        assert!(matches!(state, LoadState::Failed(_)));
        let view = session.view();
        assert_eq!(view.result_count, 0);
        assert!(view.movies.is_empty());
        assert!(view
            .message
            .unwrap()
            .starts_with("Could not load recommendations"));
    }

    #[tokio::test]
    async fn test_open_with_unreachable_source_renders_empty_state() {
        let mut source = MockDatasetSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|| Err(AppError::DataFetch("no such file".to_string())));
        source.expect_describe().returning(|| "mock".to_string());

        let session = Session::open(&source, 12, FilterState::from_input(15, Some("fr"), None), 3).await;

        assert!(matches!(session.state(), LoadState::Failed(_)));
        assert_eq!(session.pagination().page, 1);
        let text = crate::client::render::render_session(&session);
        assert!(text.contains("0 results"));
        assert!(text.contains("Could not load recommendations"));
    }

    #[tokio::test]
    async fn test_open_applies_filter_and_page() {
        let mut source = MockDatasetSource::new();
        source.expect_fetch().times(1).returning(|| Ok(dataset(25)));
        source.expect_describe().returning(|| "mock".to_string());

        let session = Session::open(&source, 12, FilterState::default(), 3).await;

        assert_eq!(session.state(), &LoadState::Ready);
        assert_eq!(session.view().movies.len(), 1);
    }
}
