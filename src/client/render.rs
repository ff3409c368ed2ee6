use std::fmt::Write;

use crate::{
    client::session::{PageView, Session},
    models::PublishedMovie,
};

const OVERVIEW_WIDTH: usize = 160;

/// Renders the session's current page as text cards
///
/// Output depends only on the session state, so rendering the same state
/// twice always yields the same text.
pub fn render_session(session: &Session) -> String {
    let mut out = render_filter_summary(session);
    out.push_str(&render_page(&session.view()));
    out
}

pub fn render_filter_summary(session: &Session) -> String {
    let filter = session.filter();
    let language = filter.language_code.as_deref().unwrap_or("all");
    let keyword = filter.keyword.as_deref().unwrap_or("-");
    format!(
        "Filters: age {} | language {} | search {}\n",
        filter.min_age, language, keyword
    )
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result_count_line(view));

    if let Some(message) = &view.message {
        let _ = writeln!(out, "\n  {message}");
        return out;
    }

    for movie in &view.movies {
        out.push('\n');
        out.push_str(&render_card(movie));
    }

    let p = &view.pagination;
    let _ = writeln!(
        out,
        "\n{} Page {}/{} {}",
        if p.has_prev { "[< prev]" } else { "[  ----]" },
        p.page,
        p.total_pages.max(1),
        if p.has_next { "[next >]" } else { "[----  ]" }
    );
    out
}

fn result_count_line(view: &PageView<'_>) -> String {
    if view.result_count == 0 {
        return "0 results".to_string();
    }
    let first = view.pagination.offset + 1;
    let last = view.pagination.offset + view.movies.len();
    format!("{} results (showing {}-{})", view.result_count, first, last)
}

/// One movie card
pub fn render_card(movie: &PublishedMovie) -> String {
    let mut out = String::new();

    let year = movie
        .release_year()
        .map(|y| format!(" ({y})"))
        .unwrap_or_default();
    let badge = if movie.is_restricted_for_minors { " [18+]" } else { "" };
    let _ = writeln!(out, "#{} {}{}{}", movie.rank, movie.title, year, badge);

    let mut details = vec![movie.language_label.clone()];
    if let Some(runtime) = movie.runtime {
        details.push(format!("{runtime} min"));
    }
    if let Some(vote) = movie.vote_average {
        let count = movie.vote_count.map(|c| format!(" / {c} votes")).unwrap_or_default();
        details.push(format!("rating {vote:.1}{count}"));
    }
    details.push(format!("score {:.2}", movie.final_score * 100.0));
    let _ = writeln!(out, "   {}", details.join(" · "));

    if !movie.genres.is_empty() {
        let _ = writeln!(out, "   {}", movie.genres.join(", "));
    }
    if !movie.overview.is_empty() {
        let _ = writeln!(out, "   {}", truncate(&movie.overview, OVERVIEW_WIDTH));
    }
    if let Some(homepage) = &movie.homepage {
        let _ = writeln!(out, "   {homepage}");
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_movie, DatasetMetadata, PublishedDataset};

    fn session(count: i64) -> Session {
        let dataset = PublishedDataset {
            metadata: DatasetMetadata::default(),
            movies: (1..=count).map(|id| sample_movie(id, &format!("Movie {id}"))).collect(),
        };
        Session::with_dataset(dataset, 12)
    }

    #[test]
    fn test_render_card() {
        let mut movie = sample_movie(1, "The Matrix");
        movie.genres = vec!["Action".to_string(), "Science Fiction".to_string()];
        movie.is_restricted_for_minors = true;
        movie.final_score = 0.8735;

        let card = render_card(&movie);
        assert!(card.starts_with("#1 The Matrix (1999) [18+]\n"));
        assert!(card.contains("English · 136 min · rating 7.9 / 1200 votes · score 87.35"));
        assert!(card.contains("Action, Science Fiction"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let s = session(25);
        assert_eq!(render_session(&s), render_session(&s));
    }

    #[test]
    fn test_render_last_page() {
        let mut s = session(25);
        s.go_to_page(3);
        let text = render_page(&s.view());
        assert!(text.starts_with("25 results (showing 25-25)"));
        assert!(text.contains("#25 Movie 25"));
        assert!(text.contains("[< prev] Page 3/3 [----  ]"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut s = session(3);
        s.set_keyword(Some("nothing matches this"));
        let text = render_page(&s.view());
        assert!(text.starts_with("0 results"));
        assert!(text.contains("No movies match the current filters."));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_filter_summary() {
        let mut s = session(1);
        s.set_language(Some("fr"));
        assert_eq!(
            render_filter_summary(&s),
            "Filters: age 18 | language fr | search -\n"
        );
    }
}
