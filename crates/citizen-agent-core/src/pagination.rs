//! Filtering and page slicing shared by every store.
//!
//! Pages are 1-indexed. A [`PageRequest`] can only be built with a
//! non-zero page and page size, so page-count arithmetic never divides
//! by zero.

use serde::Serialize;

use crate::error::ValidationError;

/// Page number used when the caller supplies none.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated (page, page size) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Create a page request. Both values must be at least 1.
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidParameter {
                name: "page",
                value: page.to_string(),
            });
        }
        if page_size == 0 {
            return Err(ValidationError::InvalidParameter {
                name: "pageSize",
                value: page_size.to_string(),
            });
        }
        Ok(Self { page, page_size })
    }

    /// Parse raw request parameters.
    ///
    /// Absent values fall back to page 1 and `default_size`. Values that are
    /// not positive integers, and page sizes above `max_size`, are rejected.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        default_size: u32,
        max_size: u32,
    ) -> Result<Self, ValidationError> {
        let page = match page {
            Some(raw) => parse_positive("page", raw)?,
            None => DEFAULT_PAGE,
        };
        let page_size = match page_size {
            Some(raw) => parse_positive("pageSize", raw)?,
            None => default_size,
        };
        if page_size > max_size {
            return Err(ValidationError::OutOfRange {
                name: "pageSize",
                max: max_size,
                got: u64::from(page_size),
            });
        }
        Self::new(page, page_size)
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the first item on this page.
    fn offset(&self) -> usize {
        let offset = u64::from(self.page - 1) * u64::from(self.page_size);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidParameter {
            name,
            value: raw.to_string(),
        }),
    }
}

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    /// Size of the filtered collection, across all pages.
    pub total_items: u64,
}

impl<T> Page<T> {
    /// `ceil(total_items / page_size)`.
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_items, self.request.page_size)
    }

    /// A page of a filter that matched nothing.
    pub fn empty(request: PageRequest) -> Self {
        Page {
            items: Vec::new(),
            request,
            total_items: 0,
        }
    }
}

/// `ceil(total_items / page_size)`. `page_size` is non-zero by construction.
pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    total_items.div_ceil(u64::from(page_size))
}

/// Filter `items` by `predicate`, preserving order, and cut out one page.
///
/// Pages past the end come back empty, not as an error.
pub fn select_page<T, F>(items: &[T], request: PageRequest, predicate: F) -> Page<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let offset = request.offset();
    let limit = request.page_size as usize;

    let mut selected = Vec::new();
    let mut total = 0usize;
    for item in items.iter().filter(|item| predicate(*item)) {
        if total >= offset && selected.len() < limit {
            selected.push(item.clone());
        }
        total += 1;
    }

    Page {
        items: selected,
        request,
        total_items: total as u64,
    }
}

/// [`select_page`] with an accept-all predicate.
pub fn select_all<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    select_page(items, request, |_| true)
}
