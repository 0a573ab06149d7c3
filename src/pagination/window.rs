use std::ops::Range;

use crate::catalog::total_pages;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// The page currently on screen and the catalog size it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page (1-based)
    page: u32,
    
    /// Items per page, fixed for the lifetime of the window
    page_size: u32,
    
    /// Last total record count reported by the catalog
    total_records: u64,
}

impl PageWindow {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_records: 0,
        }
    }
    
    /// Current page (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }
    
    /// Current page as the zero-based index page controls use
    pub fn page_index(&self) -> u32 {
        self.page - 1
    }
    
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
    
    pub fn total_records(&self) -> u64 {
        self.total_records
    }
    
    /// Total number of pages, at least one
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_records, self.page_size)
    }
    
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
    
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
    
    /// Zero-based record range the current page covers, clipped to the total
    pub fn record_range(&self) -> Range<u64> {
        let start = u64::from(self.page - 1) * u64::from(self.page_size);
        let end = (start + u64::from(self.page_size)).min(self.total_records);
        start.min(end)..end
    }
    
    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }
    
    pub(crate) fn set_total_records(&mut self, total: u64) {
        self.total_records = total;
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_window_creation() {
        let window = PageWindow::default();
        assert_eq!(window.page(), 1);
        assert_eq!(window.page_index(), 0);
        assert_eq!(window.page_size(), 12);
        assert_eq!(window.total_pages(), 1);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }
    
    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(PageWindow::new(0).page_size(), 1);
    }
    
    #[test]
    fn test_record_ranges() {
        let mut window = PageWindow::new(10);
        window.set_total_records(95);
        assert_eq!(window.total_pages(), 10);
        assert_eq!(window.record_range(), 0..10);
        
        window.set_page(5);
        assert_eq!(window.record_range(), 40..50);
        assert!(window.has_next());
        assert!(window.has_previous());
        
        window.set_page(10);
        assert_eq!(window.record_range(), 90..95);
        assert!(!window.has_next());
    }
    
    #[test]
    fn test_total_drift_past_current_page() {
        let mut window = PageWindow::new(10);
        window.set_total_records(100);
        window.set_page(8);
        
        window.set_total_records(20);
        assert_eq!(window.total_pages(), 2);
        assert_eq!(window.record_range(), 20..20);
        assert!(!window.has_next());
    }
}
