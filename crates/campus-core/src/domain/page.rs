use serde::{Deserialize, Serialize};

use super::Post;

/// Posts shown per index page.
pub const DEFAULT_PER_PAGE: u64 = 6;

/// A resolved position inside a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// 1-based page number.
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageWindow {
    /// Resolve a raw `?page=` value against a listing of `total` items.
    ///
    /// Missing or non-numeric input lands on the first page; numbers outside
    /// `1..=num_pages` land on the last page. An empty listing still has one
    /// (empty) page.
    pub fn resolve(raw: Option<&str>, total: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);

        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Some(Ok(_)) => num_pages,
            Some(Err(_)) | None => 1,
        };

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a pagination bar is worth showing at all.
    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }
}

/// One page of the post index, newest first.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub window: PageWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_defaults_to_first() {
        let window = PageWindow::resolve(None, 20, 6);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 4);
        assert_eq!(window.offset(), 0);
        assert!(window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_garbage_page_defaults_to_first() {
        assert_eq!(PageWindow::resolve(Some("abc"), 20, 6).number, 1);
        assert_eq!(PageWindow::resolve(Some(""), 20, 6).number, 1);
    }

    #[test]
    fn test_out_of_range_page_lands_on_last() {
        assert_eq!(PageWindow::resolve(Some("99"), 20, 6).number, 4);
        assert_eq!(PageWindow::resolve(Some("0"), 20, 6).number, 4);
        assert_eq!(PageWindow::resolve(Some("-3"), 20, 6).number, 4);
    }

    #[test]
    fn test_offset_for_middle_page() {
        let window = PageWindow::resolve(Some("3"), 20, 6);
        assert_eq!(window.offset(), 12);
        assert!(window.has_other_pages());
    }

    #[test]
    fn test_empty_listing_has_single_page() {
        let window = PageWindow::resolve(Some("2"), 0, 6);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.number, 1);
        assert!(!window.has_other_pages());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let window = PageWindow::resolve(Some("2"), 12, 6);
        assert_eq!(window.num_pages, 2);
        assert!(!window.has_next());
    }
}
