/// Cards shown per page
pub const PAGE_SIZE: usize = 12;

/// Pagination metadata for a filtered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages, zero for an empty result set
    pub total_pages: usize,
    /// Index of the first result on the page
    pub offset: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1))
}

/// Clamps a requested page into `[1, max(1, ceil(count / size))]`
///
/// # Examples
/// ```
/// use cinerank::client::pagination::compute_page;
///
/// assert_eq!(compute_page(25, 12, 3), 3);
/// assert_eq!(compute_page(25, 12, 9), 3);
/// assert_eq!(compute_page(0, 12, 4), 1);
/// ```
pub fn compute_page(filtered_count: usize, page_size: usize, requested_page: usize) -> usize {
    let last = total_pages(filtered_count, page_size).max(1);
    requested_page.clamp(1, last)
}

/// Calculates pagination metadata with the page clamped into range
pub fn calculate_pagination(filtered_count: usize, page_size: usize, requested_page: usize) -> Pagination {
    let total_pages = total_pages(filtered_count, page_size);
    let page = compute_page(filtered_count, page_size, requested_page);

    Pagination {
        page,
        total_pages,
        offset: (page - 1) * page_size.max(1),
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}
