//! Page-number pagination primitives shared by the payments HTTP surface.
//!
//! The crate owns three concerns:
//! - [`SearchPagination`], the normalised page request handed to stores;
//! - parsing of the bare `number`/`size` page parameters into it;
//! - [`Paginated`], the response envelope carrying page metadata and
//!   navigation links.

mod envelope;
mod params;

pub use envelope::{PageLinks, PageMeta, Paginated};
pub use params::{
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_WINDOW, PAGE_NUMBER_KEY, PAGE_SIZE_KEY, PaginationError,
    SearchPagination,
};
