use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Page {number} is outside 1..={num_pages}")]
pub struct InvalidPage {
    pub number: i64,
    pub num_pages: usize,
}

/// Splits a listing of `total` items into fixed size pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total: usize,
    pub per_page: usize,
}

/// Slice of the listing a page covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBounds {
    pub number: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Paginator {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            per_page: ITEMS_PER_PAGE,
        }
    }

    /// An empty listing still has a single, empty, first page
    pub fn num_pages(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Bounds of the 1-indexed page `number`
    pub fn page(&self, number: i64) -> Result<PageBounds, InvalidPage> {
        let num_pages = self.num_pages();
        let invalid = InvalidPage { number, num_pages };
        let index = usize::try_from(number)
            .ok()
            .filter(|n| (1..=num_pages).contains(n))
            .ok_or(invalid)?;

        let offset = (index - 1) * self.per_page;
        let limit = self.per_page.min(self.total.saturating_sub(offset));
        Ok(PageBounds {
            number: index,
            offset,
            limit,
            has_next: index < num_pages,
            has_previous: index > 1,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let paginator = Paginator::new(25);
        assert_eq!(paginator.num_pages(), 3);

        let page = paginator.page(3).unwrap();
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 5);
        assert!(!page.has_next);
        assert!(page.has_previous);

        assert_eq!(
            paginator.page(4),
            Err(InvalidPage {
                number: 4,
                num_pages: 3
            })
        );
    }

    #[test]
    fn test_first_page() {
        let page = Paginator::new(25).page(1).unwrap();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 10);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_exact_multiple() {
        let paginator = Paginator::new(20);
        assert_eq!(paginator.num_pages(), 2);
        let page = paginator.page(2).unwrap();
        assert_eq!(page.limit, 10);
        assert!(!page.has_next);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let paginator = Paginator::new(0);
        let page = paginator.page(1).unwrap();
        assert_eq!(page.limit, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
        assert!(paginator.page(2).is_err());
    }

    #[test]
    fn test_non_positive_pages() {
        let paginator = Paginator::new(5);
        assert!(paginator.page(0).is_err());
        assert!(paginator.page(-1).is_err());
    }
}
