//! Page state for paginated grids. The page controls themselves belong to
//! the renderer.

use std::ops::Range;

use crate::controlled::Controlled;

/// Current page (1-based) and rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current: usize,
    pub size: usize,
}

impl PageState {
    pub fn new(current: usize, size: usize) -> Self {
        Self {
            current: current.max(1),
            size: size.max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }

    /// Index range of the current page, clamped into the collection.
    pub fn range(&self, total: usize) -> Range<usize> {
        let page = self.current.min(self.page_count(total));
        let start = ((page - 1) * self.size).min(total);
        let end = (start + self.size).min(total);
        start..end
    }
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: Controlled<PageState>,
}

impl PaginationController {
    pub fn new(size: usize) -> Self {
        Self {
            state: Controlled::uncontrolled(PageState::new(1, size)),
        }
    }

    pub fn state(&self) -> PageState {
        *self.state.value()
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    pub fn sync(&mut self, external: PageState) {
        self.state.sync(PageState::new(external.current, external.size));
    }

    pub fn release(&mut self) {
        self.state.release();
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        self.state().range(total)
    }

    /// Move to `page`, clamped to the pages `total` rows produce.
    pub fn set_page(&mut self, page: usize, total: usize) -> PageState {
        let current = self.state();
        let page = page.clamp(1, current.page_count(total));
        self.state.set(PageState::new(page, current.size))
    }

    /// Change the page size, staying on the page that holds the first
    /// row of the current page.
    pub fn set_page_size(&mut self, size: usize, total: usize) -> PageState {
        let current = self.state();
        let first = current.range(total).start;
        let size = size.max(1);
        self.state.set(PageState::new(first / size + 1, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_clamps_past_last_page() {
        let state = PageState::new(9, 10);
        assert_eq!(state.page_count(25), 3);
        assert_eq!(state.range(25), 20..25);
        assert_eq!(PageState::new(1, 10).range(0), 0..0);
    }

    #[test]
    fn page_size_change_keeps_first_row() {
        let mut pages = PaginationController::new(10);
        pages.set_page(3, 100);
        let state = pages.set_page_size(25, 100);
        assert_eq!(state, PageState::new(1, 25));
        assert_eq!(pages.range(100), 0..25);
    }
}
