//! # Pagination State
//!
//! Search keyword and page counters shared by the catalog and search views.
//!
//! ```text
//! set_search_keyword("tolkien") ──► keyword = "tolkien", current_page = 1
//! update_total_pages(9)         ──► total_pages = ceil(9 / 4) = 3
//! page_slice(&results)          ──► results[(page-1)*4 .. page*4]
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Items shown per page.
pub const PAGE_SIZE: usize = 4;

/// Search and paging counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginationState {
    pub search_keyword: String,
    /// 1-based.
    pub current_page: usize,
    pub total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            search_keyword: String::new(),
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyword and goes back to the first page.
    pub fn set_search_keyword(&mut self, keyword: impl Into<String>) {
        self.search_keyword = keyword.into();
        self.current_page = 1;
    }

    /// Pages are not clamped; an out-of-range page simply shows nothing.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// `ceil(total_results / PAGE_SIZE)`. No results means zero pages.
    pub fn update_total_pages(&mut self, total_results: usize) {
        self.total_pages = total_results.div_ceil(PAGE_SIZE);
    }

    /// Case-insensitive substring match against the keyword.
    /// An empty keyword matches everything.
    pub fn matches(&self, text: &str) -> bool {
        let keyword = self.search_keyword.trim();
        keyword.is_empty() || text.to_lowercase().contains(&keyword.to_lowercase())
    }

    /// The items on the current page.
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.current_page == 0 {
            return &[];
        }
        let start = (self.current_page - 1).saturating_mul(PAGE_SIZE);
        if start >= items.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(items.len());
        &items[start..end]
    }
}
