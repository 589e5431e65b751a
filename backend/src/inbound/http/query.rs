//! Query-string decoding for search endpoints.

use url::form_urlencoded;

use crate::domain::search::{QueryParams, extract_pagination, extract_search_filter, page_params};
use crate::domain::{Error, PaymentFilterStrategy, PaymentSearchRequest};

/// Decode a raw query string into a multi-valued parameter map.
///
/// Comma-separated values are split and repeated keys accumulate, so
/// `filter[id]=a,b&filter[id]=c` yields three values.
pub fn query_params(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_default()
            .extend(value.split(',').map(str::to_owned));
    }
    params
}

/// Build a payment search from query parameters.
///
/// The search is paginated when at least one `page[...]` key is present.
///
/// # Errors
/// `INVALID_ARGUMENT` for malformed keys, unsupported filter fields, bad
/// identifiers and bad paging values.
pub fn payment_search_request(params: &QueryParams) -> Result<PaymentSearchRequest, Error> {
    let filter = extract_search_filter(params, &PaymentFilterStrategy)?;
    let pagination = page_params(params)
        .map(|page| extract_pagination(&page))
        .transpose()?;
    Ok(PaymentSearchRequest { filter, pagination })
}
