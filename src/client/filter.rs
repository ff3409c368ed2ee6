use crate::models::{FilterState, PublishedMovie};

/// Whether a movie passes every active filter
pub fn matches(movie: &PublishedMovie, filter: &FilterState) -> bool {
    if filter.hides_restricted() && movie.is_restricted_for_minors {
        return false;
    }

    if let Some(language) = &filter.language_code {
        if !movie.language_code.eq_ignore_ascii_case(language) {
            return false;
        }
    }

    if let Some(keyword) = &filter.keyword {
        let needle = keyword.to_lowercase();
        if !search_text(movie).contains(&needle) {
            return false;
        }
    }

    true
}

/// Lower-cased text searched by the keyword filter
fn search_text(movie: &PublishedMovie) -> String {
    [
        movie.title.as_str(),
        movie.overview.as_str(),
        movie.language_label.as_str(),
        &movie.genres.join(" "),
        &movie.keywords.join(" "),
    ]
    .join(" ")
    .to_lowercase()
}

/// Movies passing the filter, in their published order
pub fn apply_filter<'a>(movies: &'a [PublishedMovie], filter: &FilterState) -> Vec<&'a PublishedMovie> {
    movies.iter().filter(|m| matches(m, filter)).collect()
}
