//! Offset/limit pagination arithmetic.
//!
//! 1-based page window over a server-reported total. Invariant:
//! `1 <= current_page <= total_pages` at all times; navigation outside that
//! range is a silent no-op. `total_pages` is never zero, even with no items.

/// Page window state for an offset/limit-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: u64,
    items_per_page: u32,
    total_items: u64,
}

impl Pager {
    /// `items_per_page` is fixed for the lifetime of the pager; zero is
    /// clamped up to one.
    pub fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// `max(1, ceil(total_items / items_per_page))`.
    pub fn total_pages(&self) -> u64 {
        let per_page = u64::from(self.items_per_page);
        (self.total_items.div_ceil(per_page)).max(1)
    }

    /// Skip count for the current page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1) * u64::from(self.items_per_page)
    }

    /// Record a server-reported total. If the total shrank below the current
    /// page, the page is clamped to the last valid one. Returns true if the
    /// current page moved.
    pub fn set_total(&mut self, total_items: u64) -> bool {
        self.total_items = total_items;
        let last = self.total_pages();
        if self.current_page > last {
            self.current_page = last;
            true
        } else {
            false
        }
    }

    /// Jump to page `page`. Out-of-range targets leave the pager unchanged.
    /// Returns true if the current page moved.
    pub fn go_to(&mut self, page: u64) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn prev(&mut self) -> bool {
        // current_page is at least 1; go_to rejects page 0
        self.go_to(self.current_page.wrapping_sub(1))
    }

    /// Back to page 1 (e.g. when the search term changes). Returns true if
    /// the current page moved.
    pub fn reset(&mut self) -> bool {
        if self.current_page == 1 {
            return false;
        }
        self.current_page = 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let pager = Pager::new(25);
        assert_eq!(pager.total_items(), 0);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let mut pager = Pager::new(25);
        pager.set_total(60);
        assert_eq!(pager.total_pages(), 3);
        pager.set_total(50);
        assert_eq!(pager.total_pages(), 2);
        pager.set_total(1);
        assert_eq!(pager.total_pages(), 1);
    }

    #[test]
    fn out_of_range_navigation_is_a_no_op() {
        let mut pager = Pager::new(25);
        pager.set_total(60);

        assert!(!pager.go_to(0));
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.go_to(4));
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.prev());
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn next_on_last_page_is_a_no_op() {
        let mut pager = Pager::new(25);
        pager.set_total(60);
        assert!(pager.go_to(3));
        assert!(!pager.next());
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn offset_tracks_current_page() {
        let mut pager = Pager::new(25);
        pager.set_total(60);
        assert_eq!(pager.offset(), 0);
        pager.go_to(3);
        assert_eq!(pager.offset(), 50);
        pager.prev();
        assert_eq!(pager.offset(), 25);
    }

    #[test]
    fn shrinking_total_clamps_current_page() {
        let mut pager = Pager::new(10);
        pager.set_total(100);
        pager.go_to(10);
        assert!(pager.set_total(41));
        assert_eq!(pager.current_page(), 5);
        assert!(!pager.set_total(41));
    }

    #[test]
    fn reset_returns_to_page_one() {
        let mut pager = Pager::new(10);
        pager.set_total(100);
        pager.go_to(7);
        assert!(pager.reset());
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.reset());
    }

    #[test]
    fn zero_items_per_page_is_clamped() {
        let pager = Pager::new(0);
        assert_eq!(pager.items_per_page(), 1);
        assert_eq!(pager.total_pages(), 1);
    }
}
