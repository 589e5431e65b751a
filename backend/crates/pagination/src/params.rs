//! Page request value type and parameter parsing.

use thiserror::Error;

/// Page number used when the request does not name one.
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Bare key selecting the page number.
pub const PAGE_NUMBER_KEY: &str = "number";
/// Bare key selecting the page size.
pub const PAGE_SIZE_KEY: &str = "size";

/// Largest offset or limit a page may produce; stores address rows with
/// signed 64-bit integers.
pub const MAX_PAGE_WINDOW: u64 = i64::MAX.unsigned_abs();

/// Errors raised while parsing page parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A key other than `number` or `size` was supplied.
    #[error("unsupported paging parameter `{key}`")]
    UnsupportedParameter {
        /// Offending parameter key.
        key: String,
    },
    /// A recognised key carried a value that is not a positive integer.
    #[error("paging parameter `{key}` must be a positive integer, got {value:?}")]
    InvalidValue {
        /// Parameter key.
        key: String,
        /// Raw value as received.
        value: String,
    },
    /// The page lies beyond [`MAX_PAGE_WINDOW`] records.
    #[error("page {page} of size {size} exceeds the supported range")]
    OutOfRange {
        /// Requested page number.
        page: u64,
        /// Requested page size.
        size: u64,
    },
}

/// Normalised page request.
///
/// Both components are always at least one: zero is replaced by the default
/// at construction time.
///
/// # Examples
/// ```
/// use pagination::SearchPagination;
///
/// let page = SearchPagination::new(5, 10);
/// assert_eq!(page.offset(), 40);
/// assert_eq!(page.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchPagination {
    page: u64,
    size: u64,
}

impl SearchPagination {
    /// Build a page request, substituting defaults for zero components.
    #[must_use]
    pub const fn new(page: u64, size: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE_NUMBER } else { page },
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    /// Parse bare page parameters (`number`, `size`).
    ///
    /// Absent keys fall back to the defaults. A key that is present must hold
    /// a positive decimal integer; zero is rejected rather than defaulted.
    ///
    /// # Errors
    /// Returns [`PaginationError::UnsupportedParameter`] for unknown keys,
    /// [`PaginationError::InvalidValue`] for zero or non-digit values and
    /// [`PaginationError::OutOfRange`] when the offset or limit would exceed
    /// [`MAX_PAGE_WINDOW`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{PaginationError, SearchPagination};
    ///
    /// let page = SearchPagination::from_params([("number", "2")])?;
    /// assert_eq!((page.page(), page.size()), (2, 100));
    /// # Ok::<(), PaginationError>(())
    /// ```
    pub fn from_params<'a, I>(params: I) -> Result<Self, PaginationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page = 0;
        let mut size = 0;
        for (key, value) in params {
            let slot = match key {
                PAGE_NUMBER_KEY => &mut page,
                PAGE_SIZE_KEY => &mut size,
                other => {
                    return Err(PaginationError::UnsupportedParameter {
                        key: other.to_owned(),
                    });
                }
            };
            *slot = parse_positive(key, value)?;
        }
        let pagination = Self::new(page, size);
        pagination.check_window()?;
        Ok(pagination)
    }

    fn check_window(self) -> Result<(), PaginationError> {
        let offset = self.size.checked_mul(self.page - 1);
        match offset {
            Some(offset) if offset <= MAX_PAGE_WINDOW && self.size <= MAX_PAGE_WINDOW => Ok(()),
            _ => Err(PaginationError::OutOfRange {
                page: self.page,
                size: self.size,
            }),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }

    /// Number of records to skip before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.size.saturating_mul(self.page - 1)
    }
}

impl Default for SearchPagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, PaginationError> {
    let digits_only = !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit());
    match value.parse::<u64>() {
        Ok(parsed) if digits_only && parsed > 0 => Ok(parsed),
        _ => Err(PaginationError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}
