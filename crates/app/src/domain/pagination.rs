//! Pagination

/// Page number used when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page request, falling back to defaults for missing or zero values and
    /// clamping the limit to [`MAX_LIMIT`].
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        Self { page, limit }
    }

    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Rows to skip before this page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Number of pages needed to show every result.
    #[must_use]
    pub fn pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.limit()))
    }

    /// Transform the items while keeping pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

pub(crate) fn sql_limit_offset(request: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

    (i64::from(request.limit()), offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let request = PageRequest::new(None, None);

        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn zero_values_fall_back_to_defaults() {
        let request = PageRequest::new(Some(0), Some(0));

        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn limit_is_clamped() {
        let request = PageRequest::new(Some(2), Some(1_000));

        assert_eq!(request.limit(), MAX_LIMIT);
        assert_eq!(request.offset(), u64::from(MAX_LIMIT));
    }

    #[test]
    fn pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 21, PageRequest::new(Some(3), Some(10)));

        assert_eq!(page.pages(), 3);
    }

    #[test]
    fn pages_is_zero_for_empty_results() {
        let page: Page<u8> = Page::new(vec![], 0, PageRequest::default());

        assert_eq!(page.pages(), 0);
    }
}
