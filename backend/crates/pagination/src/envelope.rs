//! Paginated response envelope with page metadata and navigation links.

use serde::Serialize;
use url::Url;

use crate::params::{PAGE_NUMBER_KEY, PAGE_SIZE_KEY, SearchPagination};

/// Metadata describing where a page sits within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// One-based page number that was served.
    pub number: u64,
    /// Requested page size.
    pub size: u64,
    /// Total number of matching records across all pages.
    pub total: u64,
    /// Number of pages needed to cover `total`; at least one.
    pub pages: u64,
}

impl PageMeta {
    /// Derive metadata for `pagination` against `total` matching records.
    #[must_use]
    pub const fn new(pagination: SearchPagination, total: u64) -> Self {
        let pages = total.div_ceil(pagination.size());
        Self {
            number: pagination.page(),
            size: pagination.size(),
            total,
            pages: if pages == 0 { 1 } else { pages },
        }
    }
}

/// Navigation links rendered with `page[number]` and `page[size]` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Link to the page that was served.
    #[serde(rename = "self")]
    pub current: String,
    /// Link to the first page.
    pub first: String,
    /// Link to the last page.
    pub last: String,
    /// Link to the previous page, absent on the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Link to the next page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageLinks {
    /// Build links relative to `base`, preserving its non-page query pairs.
    #[must_use]
    pub fn build(base: &Url, meta: &PageMeta) -> Self {
        let link = |number: u64| page_url(base, number, meta.size);
        Self {
            current: link(meta.number),
            first: link(1),
            last: link(meta.pages),
            prev: (meta.number > 1).then(|| link(meta.number - 1)),
            next: (meta.number < meta.pages).then(|| link(meta.number + 1)),
        }
    }
}

/// A page of records plus metadata and links.
///
/// # Examples
/// ```
/// use pagination::{Paginated, SearchPagination};
/// use url::Url;
///
/// let base = Url::parse("http://localhost/v1/payments").expect("valid url");
/// let page = Paginated::new(vec![1, 2], SearchPagination::new(1, 2), 5, &base);
/// assert_eq!(page.meta.pages, 3);
/// assert!(page.links.prev.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Records on this page.
    pub data: Vec<T>,
    /// Page metadata.
    pub meta: PageMeta,
    /// Navigation links.
    pub links: PageLinks,
}

impl<T> Paginated<T> {
    /// Wrap `data` as the page selected by `pagination`.
    #[must_use]
    pub fn new(data: Vec<T>, pagination: SearchPagination, total: u64, base: &Url) -> Self {
        let meta = PageMeta::new(pagination, total);
        let links = PageLinks::build(base, &meta);
        Self { data, meta, links }
    }
}

fn is_page_key(key: &str) -> bool {
    key.starts_with("page[") && key.ends_with(']')
}

fn page_url(base: &Url, number: u64, size: u64) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !is_page_key(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .append_pair(&format!("page[{PAGE_NUMBER_KEY}]"), &number.to_string())
        .append_pair(&format!("page[{PAGE_SIZE_KEY}]"), &size.to_string());
    url.into()
}
