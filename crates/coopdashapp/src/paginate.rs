//! Page slicing.
//!
//! Pages are 1-based. A request for a page outside `1..=total_pages` is not an
//! error: it is clamped to the nearest valid page, so page 0 shows the first
//! page and page 99 of a three-page result shows the third. An empty input
//! still has one (empty) page.
//!
//! The only failure is a non-positive page size, rejected before anything is
//! sliced.

use serde::{Deserialize, Serialize};

use crate::error::{CoopdashError, Result};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }
}

/// One page of results plus the numbers the pagination footer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub records: Vec<T>,
    /// Effective page, after clamping.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> PageResult<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based inclusive positions of the first and last record on this page,
    /// for "Showing 21-40 of 45". `None` when the page is empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.records.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.records.len() - 1))
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            records: self.records.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Reject page sizes below 1.
pub fn validate_page_size(page_size: i64) -> Result<usize> {
    if page_size <= 0 {
        return Err(CoopdashError::InvalidPageSize(page_size));
    }
    usize::try_from(page_size).map_err(|_| CoopdashError::InvalidPageSize(page_size))
}

/// `max(1, ceil(total_items / page_size))`.
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size).max(1)
}

/// Slice `records` down to the requested page.
pub fn paginate<T>(records: Vec<T>, request: PageRequest) -> Result<PageResult<T>> {
    let page_size = validate_page_size(request.page_size)?;
    let total_items = records.len();
    let total_pages = page_count(total_items, page_size);
    let page = clamp_page(request.page, total_pages);

    let start = (page - 1) * page_size;
    let records: Vec<T> = records.into_iter().skip(start).take(page_size).collect();

    Ok(PageResult {
        records,
        page,
        page_size,
        total_items,
        total_pages,
    })
}

fn clamp_page(requested: i64, total_pages: usize) -> usize {
    if requested < 1 {
        return 1;
    }
    usize::try_from(requested).map_or(total_pages, |p| p.min(total_pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn forty_five_items_in_pages_of_twenty() {
        let page = paginate(numbers(45), PageRequest::new(3, 20)).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.item_range(), Some((41, 45)));
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let first = paginate(numbers(45), PageRequest::new(1, 20)).unwrap();
        let zero = paginate(numbers(45), PageRequest::new(0, 20)).unwrap();
        let negative = paginate(numbers(45), PageRequest::new(-7, 20)).unwrap();
        assert_eq!(zero, first);
        assert_eq!(negative, first);

        let last = paginate(numbers(45), PageRequest::new(3, 20)).unwrap();
        let beyond = paginate(numbers(45), PageRequest::new(99, 20)).unwrap();
        assert_eq!(beyond, last);
        assert_eq!(beyond.page, 3);
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let page = paginate(Vec::<usize>::new(), PageRequest::new(5, 10)).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.item_range(), None);
        assert!(!page.has_next());
    }

    #[test]
    fn non_positive_page_size_is_rejected() {
        for size in [0, -1, i64::MIN] {
            let err = paginate(numbers(3), PageRequest::new(1, size)).unwrap_err();
            assert!(matches!(err, CoopdashError::InvalidPageSize(s) if s == size));
        }
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(page_count(40, 20), 2);
        assert_eq!(page_count(41, 20), 3);
        assert_eq!(page_count(0, 20), 1);
    }

    #[test]
    fn map_keeps_page_numbers() {
        let page = paginate(numbers(5), PageRequest::new(2, 2)).unwrap();
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.records, vec![30, 40]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total_pages, 3);
    }

    proptest! {
        #[test]
        fn pages_partition_the_input(len in 0usize..200, size in 1i64..50) {
            let items = numbers(len);
            let total_pages = page_count(len, size as usize);

            let mut seen = Vec::new();
            for p in 1..=total_pages {
                let page = paginate(items.clone(), PageRequest::new(p as i64, size)).unwrap();
                prop_assert!(page.records.len() <= size as usize);
                seen.extend(page.records);
            }
            prop_assert_eq!(seen, items);
        }

        #[test]
        fn beyond_last_page_equals_last_page(len in 0usize..200, size in 1i64..50, extra in 1i64..1000) {
            let items = numbers(len);
            let total_pages = page_count(len, size as usize) as i64;

            let last = paginate(items.clone(), PageRequest::new(total_pages, size)).unwrap();
            let beyond = paginate(items, PageRequest::new(total_pages + extra, size)).unwrap();
            prop_assert_eq!(beyond.records, last.records);
        }
    }
}
