//! Pagination of list and search results
//!
//! A listing is split into pages of `per_page` items. The page requested by a
//! client arrives as a raw `?page=` token and is resolved against the total
//! count:
//!
//! - absent or non-integer tokens fall back to page 1
//! - `last` resolves to the final page
//! - integers outside `1..=num_pages` are out of range
//!
//! An empty listing still has one (empty) page.

use serde::Serialize;
use thiserror::Error;

/// Raised when an integer page number does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page {page} is out of range (1..={num_pages})")]
    OutOfRange { page: i64, num_pages: i64 },
}

/// A parsed `?page=` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    First,
    Last,
    Number(i64),
}

impl PageToken {
    /// Parse a raw query value; anything unrecognised means the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return PageToken::First;
        };

        if raw == "last" {
            return PageToken::Last;
        }

        match raw.parse::<i64>() {
            Ok(n) => PageToken::Number(n),
            Err(_) => PageToken::First,
        }
    }
}

/// Page arithmetic for a listing of `total` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: i64,
    per_page: i64,
}

impl Paginator {
    /// `per_page` below 1 is treated as 1.
    pub fn new(total: i64, per_page: i64) -> Self {
        Self {
            total: total.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn num_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a token to a concrete page number
    pub fn resolve(&self, token: PageToken) -> Result<i64, PaginationError> {
        let num_pages = self.num_pages();
        match token {
            PageToken::First => Ok(1),
            PageToken::Last => Ok(num_pages),
            PageToken::Number(page) if (1..=num_pages).contains(&page) => Ok(page),
            PageToken::Number(page) => Err(PaginationError::OutOfRange { page, num_pages }),
        }
    }

    /// Row offset of the first item on `page`
    pub fn offset(&self, page: i64) -> i64 {
        (page.max(1) - 1).saturating_mul(self.per_page)
    }

    /// Number of rows to fetch per page
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// One page of results, as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<i64>,
    pub previous_page_number: Option<i64>,
    /// 1-based index of the first item, 0 for an empty listing
    pub start_index: i64,
    /// 1-based index of the last item, 0 for an empty listing
    pub end_index: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: i64, paginator: &Paginator) -> Self {
        let num_pages = paginator.num_pages();
        let total = paginator.total();
        let per_page = paginator.per_page();

        let has_next = number < num_pages;
        let has_previous = number > 1;

        let start_index = if total == 0 {
            0
        } else {
            paginator.offset(number) + 1
        };
        let end_index = if number == num_pages {
            total
        } else {
            number * per_page
        };

        Self {
            items,
            number,
            num_pages,
            total,
            per_page,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then_some(number - 1),
            start_index,
            end_index,
        }
    }

    /// Convert the items while keeping the page metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_page_token() {
        assert_eq!(PageToken::parse(None), PageToken::First);
        assert_eq!(PageToken::parse(Some("3")), PageToken::Number(3));
        assert_eq!(PageToken::parse(Some(" 2 ")), PageToken::Number(2));
        assert_eq!(PageToken::parse(Some("last")), PageToken::Last);
        assert_eq!(PageToken::parse(Some("abc")), PageToken::First);
        assert_eq!(PageToken::parse(Some("")), PageToken::First);
        assert_eq!(PageToken::parse(Some("1.5")), PageToken::First);
        assert_eq!(PageToken::parse(Some("0")), PageToken::Number(0));
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let paginator = Paginator::new(0, 10);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.resolve(PageToken::Number(1)), Ok(1));
        assert_eq!(paginator.resolve(PageToken::Last), Ok(1));

        let page: Page<i64> = Page::new(vec![], 1, &paginator);
        assert_eq!(page.start_index, 0);
        assert_eq!(page.end_index, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_out_of_range() {
        let paginator = Paginator::new(5, 2);
        assert_eq!(paginator.num_pages(), 3);
        assert_eq!(
            paginator.resolve(PageToken::Number(4)),
            Err(PaginationError::OutOfRange { page: 4, num_pages: 3 })
        );
        assert!(paginator.resolve(PageToken::Number(0)).is_err());
        assert!(paginator.resolve(PageToken::Number(-1)).is_err());
    }

    #[test]
    fn test_page_metadata() {
        let paginator = Paginator::new(5, 2);

        let middle = Page::new(vec![3, 4], 2, &paginator);
        assert_eq!(middle.next_page_number, Some(3));
        assert_eq!(middle.previous_page_number, Some(1));
        assert_eq!((middle.start_index, middle.end_index), (3, 4));

        let last = Page::new(vec![5], 3, &paginator);
        assert!(!last.has_next);
        assert_eq!(last.next_page_number, None);
        assert_eq!((last.start_index, last.end_index), (5, 5));
    }

    #[test]
    fn test_map_keeps_metadata() {
        let paginator = Paginator::new(3, 1);
        let page = Page::new(vec![2], 2, &paginator).map(|n| n.to_string());
        assert_eq!(page.items, vec!["2".to_string()]);
        assert_eq!(page.number, 2);
        assert!(page.has_next && page.has_previous);
    }

    proptest! {
        #[test]
        fn non_numeric_tokens_resolve_to_first_page(token in "[a-zA-Z]{1,8}", total in 0i64..500, per_page in 1i64..20) {
            prop_assume!(token != "last");
            let paginator = Paginator::new(total, per_page);
            prop_assert_eq!(paginator.resolve(PageToken::parse(Some(&token))), Ok(1));
        }

        #[test]
        fn pages_cover_every_item_exactly_once(total in 0i64..500, per_page in 1i64..20) {
            let paginator = Paginator::new(total, per_page);
            let mut covered = 0;
            for number in 1..=paginator.num_pages() {
                let page: Page<()> = Page::new(vec![], number, &paginator);
                if total > 0 {
                    prop_assert_eq!(page.start_index, covered + 1);
                    covered = page.end_index;
                }
            }
            prop_assert_eq!(covered, total);
        }

        #[test]
        fn resolved_pages_are_in_range(total in 0i64..500, per_page in 1i64..20, requested in -5i64..60) {
            let paginator = Paginator::new(total, per_page);
            match paginator.resolve(PageToken::Number(requested)) {
                Ok(page) => prop_assert!(page >= 1 && page <= paginator.num_pages()),
                Err(PaginationError::OutOfRange { page, num_pages }) => {
                    prop_assert_eq!(page, requested);
                    prop_assert!(page < 1 || page > num_pages);
                }
            }
        }
    }
}
