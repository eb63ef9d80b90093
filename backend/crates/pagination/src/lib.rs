//! Page-number pagination primitives shared by Bookshelf list endpoints.
//!
//! [`PageRequest`] validates the caller's page selection and exposes the
//! offset/limit pair a repository needs. [`Page`] is the response envelope
//! returned to clients:
//!
//! ```json
//! {"data": [], "currentPage": 1, "perPage": 10, "total": 0, "lastPage": 1}
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised while validating a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// Page size was zero or above [`MAX_PER_PAGE`].
    #[error("per page must be between 1 and {max}")]
    PerPageOutOfRange {
        /// Upper bound on the page size.
        max: u32,
    },
}

/// A validated, one-based page selection.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid page");
/// assert_eq!(request.offset(), 20);
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate a page number and page size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` falls
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query values, applying defaults.
    ///
    /// # Errors
    /// Propagates the validation errors of [`PageRequest::new`].
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Pagination envelope wrapping one page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on the current page.
    pub data: Vec<T>,
    /// One-based number of the current page.
    pub current_page: u32,
    /// Page size used to slice the collection.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Number of the last page; `1` for an empty collection.
    pub last_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page from its items, the originating request, and the
    /// collection total.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let page = Page::new(vec!["a", "b"], PageRequest::new(1, 2).expect("valid"), 5);
    /// assert_eq!(page.last_page, 3);
    /// ```
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let last_page = total.div_ceil(request.limit()).max(1);
        Self {
            data,
            current_page: request.page(),
            per_page: request.per_page(),
            total,
            last_page,
        }
    }

    /// Transform every item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}
