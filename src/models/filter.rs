use serde::{Deserialize, Serialize};

/// Age at which restricted movies become visible
pub const ADULT_AGE: u32 = 18;

/// Client-side filter state, re-derived on every input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_age: u32,
    pub language_code: Option<String>,
    pub keyword: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_age: ADULT_AGE,
            language_code: None,
            keyword: None,
        }
    }
}

impl FilterState {
    /// Builds a filter from raw user input, treating "all" and blanks as unset
    pub fn from_input(min_age: u32, language: Option<&str>, keyword: Option<&str>) -> Self {
        Self {
            min_age,
            language_code: normalize_language(language),
            keyword: normalize_keyword(keyword),
        }
    }

    pub fn hides_restricted(&self) -> bool {
        self.min_age < ADULT_AGE
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

pub fn normalize_language(language: Option<&str>) -> Option<String> {
    language
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

pub fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_language_is_no_filter() {
        let filter = FilterState::from_input(18, Some("ALL"), None);
        assert_eq!(filter.language_code, None);
        assert!(filter.is_default());
    }

    #[test]
    fn test_blank_keyword_is_no_filter() {
        let filter = FilterState::from_input(18, None, Some("   "));
        assert_eq!(filter.keyword, None);
    }

    #[test]
    fn test_age_threshold_is_strict() {
        assert!(FilterState::from_input(17, None, None).hides_restricted());
        assert!(!FilterState::from_input(18, None, None).hides_restricted());
    }
}
