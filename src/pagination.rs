use std::ops::Range;

use serde::Serialize;

/// Largest number of page links exposed around the current page.
pub const MAX_VISIBLE_PAGES: usize = 10;

/// First and last page of the visible window, both one-based and inclusive.
fn page_window(total_pages: usize, current_page: usize, max_pages: usize) -> (usize, usize) {
    if total_pages <= max_pages {
        return (1, total_pages);
    }

    let before_current = max_pages / 2;
    let after_current = max_pages.div_ceil(2) - 1;
    let current_page = current_page.clamp(1, total_pages);

    if current_page <= before_current {
        (1, max_pages)
    } else if current_page + after_current >= total_pages {
        (total_pages + 1 - max_pages, total_pages)
    } else {
        (current_page - before_current, current_page + after_current)
    }
}

/// Pagination metadata computed from the filtered total.
///
/// `end_index` is `None` when the requested page lies past the last record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub total_items: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub start_page: usize,
    pub end_page: usize,
    pub start_index: usize,
    pub end_index: Option<usize>,
    pub pages: Vec<usize>,
}

impl PageData {
    pub fn new(total_items: usize, current_page: usize, page_size: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let page_size = if page_size == 0 { 1 } else { page_size };

        let total_pages = total_items.div_ceil(page_size);
        let (start_page, end_page) = page_window(total_pages, current_page, MAX_VISIBLE_PAGES);

        let start_index = (current_page - 1).saturating_mul(page_size);
        let end_index = (start_index < total_items)
            .then(|| start_index.saturating_add(page_size).min(total_items) - 1);

        Self {
            total_items,
            current_page,
            page_size,
            total_pages,
            start_page,
            end_page,
            start_index,
            end_index,
            pages: (start_page..=end_page).collect(),
        }
    }

    /// Positions of the page's records within the filtered sequence.
    pub fn range(&self) -> Range<usize> {
        match self.end_index {
            Some(end_index) => self.start_index..end_index + 1,
            None => self.start_index..self.start_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_small_result() {
        let page = PageData::new(12, 1, 5);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.start_index, 0);
        assert_eq!(page.end_index, Some(4));
        assert_eq!(page.pages, vec![1, 2, 3]);
        assert_eq!(page.range(), 0..5);
    }

    #[test]
    fn last_page_is_truncated() {
        let page = PageData::new(12, 3, 5);

        assert_eq!(page.start_index, 10);
        assert_eq!(page.end_index, Some(11));
        assert_eq!(page.range(), 10..12);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = PageData::new(3, 2, 5);

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.end_index, None);
        assert!(page.range().is_empty());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page = PageData::new(0, 1, 5);

        assert_eq!(page.total_pages, 0);
        assert!(page.pages.is_empty());
        assert_eq!(page.end_index, None);
    }

    #[test]
    fn window_is_capped_at_ten_pages() {
        assert_eq!(page_window(30, 1, 10), (1, 10));
        assert_eq!(page_window(30, 5, 10), (1, 10));
        assert_eq!(page_window(30, 6, 10), (1, 10));
        assert_eq!(page_window(30, 15, 10), (10, 19));
        assert_eq!(page_window(30, 27, 10), (21, 30));
        assert_eq!(page_window(30, 99, 10), (21, 30));
        assert_eq!(page_window(7, 4, 10), (1, 7));
    }

    #[test]
    fn serializes_camel_case_keys() {
        let value = serde_json::to_value(PageData::new(1, 1, 5)).unwrap();

        assert_eq!(value["totalItems"], 1);
        assert_eq!(value["endIndex"], 0);
        assert!(PageData::new(1, 2, 5).end_index.is_none());
    }
}
