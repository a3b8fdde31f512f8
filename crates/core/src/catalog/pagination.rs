//! Pagination over the movie list.

use cinelog_domain::PageRequest;

/// Position within a paginated list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub per_page: u32,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(current: u32, per_page: u32, total_items: u64) -> Self {
        Self { current: current.max(1), per_page: per_page.max(1), total_items }
    }

    /// `ceil(total_items / per_page)`; zero when the list is empty.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Previous page, clamped at 1.
    pub fn previous_page(&self) -> u32 {
        self.current.saturating_sub(1).max(1)
    }

    /// Next page, clamped at the last page.
    pub fn next_page(&self) -> u32 {
        self.current.saturating_add(1).min(self.total_pages().max(1))
    }

    /// Page numbers to render, `1..=total_pages`.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        1..=self.total_pages()
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.current, self.per_page)
    }
}
