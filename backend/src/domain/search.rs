//! Query parameter extraction for resource searches.
//!
//! Inbound adapters hand over the raw parameter bag; this module turns
//! `filter[<field>]` keys into a typed [`SearchFilter`] through a
//! resource-specific [`FilterStrategy`], and bare page keys into a
//! [`SearchPagination`]. Both operations are pure.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use pagination::{PaginationError, SearchPagination};
use regex::Regex;

use super::Error;

/// Multi-valued query parameters keyed by their raw name.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Page parameters keyed by their bare name (`number`, `size`).
pub type PageParams = BTreeMap<String, String>;

static FILTER_KEY_RE: OnceLock<Regex> = OnceLock::new();
static PAGE_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn filter_key_regex() -> &'static Regex {
    FILTER_KEY_RE.get_or_init(|| {
        Regex::new(r"^filter\[([\w.]+)\]$")
            .unwrap_or_else(|error| panic!("filter key regex failed to compile: {error}"))
    })
}

fn page_key_regex() -> &'static Regex {
    PAGE_KEY_RE.get_or_init(|| {
        Regex::new(r"^page\[(\w+)\]$")
            .unwrap_or_else(|error| panic!("page key regex failed to compile: {error}"))
    })
}

/// Resource-specific parser for filter fields.
///
/// Implementations recognise a closed set of field names and turn their raw
/// values into a typed value. Unknown fields must be rejected.
pub trait FilterStrategy: Send + Sync {
    /// Typed value produced for a recognised field.
    type Value;

    /// Parse the raw values of `field`.
    ///
    /// # Errors
    /// Returns an error when the field is unknown or a value is malformed.
    fn parse(&self, field: &str, values: &[String]) -> Result<Self::Value, Error>;
}

/// Typed search criteria keyed by bare field name.
///
/// Every key was accepted by the owning resource's [`FilterStrategy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter<V> {
    fields: BTreeMap<String, V>,
}

impl<V> SearchFilter<V> {
    /// An empty filter matching every record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Value recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&V> {
        self.fields.get(field)
    }

    /// Number of constrained fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }
}

impl<V> Default for SearchFilter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for SearchFilter<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Build a [`SearchFilter`] from raw query parameters.
///
/// `filter[<field>]` keys are parsed with `strategy`; `page[<key>]` keys are
/// skipped because [`extract_pagination`] owns them. Any other key shape is
/// rejected.
///
/// # Errors
/// Returns `INVALID_ARGUMENT` with message "invalid query parameter" for an
/// unrecognised key shape, and "invalid filter parameter" when the strategy
/// rejects a field; the strategy's own failure survives only as detail text.
///
/// # Examples
/// ```
/// use payments::domain::search::{QueryParams, extract_search_filter};
/// use payments::domain::PaymentFilterStrategy;
///
/// let mut params = QueryParams::new();
/// params.insert("filter[debtor.account_number]".into(), vec!["71268996".into()]);
/// params.insert("page[number]".into(), vec!["1".into()]);
///
/// let filter = extract_search_filter(&params, &PaymentFilterStrategy).expect("valid filter");
/// assert_eq!(filter.len(), 1);
/// ```
pub fn extract_search_filter<S>(
    params: &QueryParams,
    strategy: &S,
) -> Result<SearchFilter<S::Value>, Error>
where
    S: FilterStrategy + ?Sized,
{
    let mut fields = BTreeMap::new();
    for (key, values) in params {
        if page_key_regex().is_match(key) {
            continue;
        }
        let Some(field) = filter_key_regex()
            .captures(key)
            .and_then(|captures| captures.get(1))
            .map(|matched| matched.as_str())
        else {
            return Err(Error::invalid_argument("invalid query parameter", key.as_str()));
        };
        let value = strategy.parse(field, values).map_err(|cause| {
            Error::invalid_argument(
                "invalid filter parameter",
                format!("field {field:?}: {}: {}", cause.message(), cause.detail()),
            )
        })?;
        fields.insert(field.to_owned(), value);
    }
    Ok(SearchFilter { fields })
}

/// Collect `page[<key>]` parameters under their bare key.
///
/// Returns `None` when the request carries no page parameter, so callers can
/// tell an unpaginated search from one that relies on page defaults. The first
/// value wins when a key repeats.
#[must_use]
pub fn page_params(params: &QueryParams) -> Option<PageParams> {
    let collected: PageParams = params
        .iter()
        .filter_map(|(key, values)| {
            let bare = page_key_regex().captures(key)?.get(1)?.as_str().to_owned();
            let value = values.first().cloned().unwrap_or_default();
            Some((bare, value))
        })
        .collect();
    (!collected.is_empty()).then_some(collected)
}

/// Build a [`SearchPagination`] from bare page parameters.
///
/// Absent keys take the defaults (page 1, size 100). Present keys must hold a
/// positive integer.
///
/// # Errors
/// Returns `INVALID_ARGUMENT` with message "unsupported paging parameter" for
/// keys other than `number` and `size`, and "invalid paging parameter" for
/// zero or unparsable values.
pub fn extract_pagination(params: &PageParams) -> Result<SearchPagination, Error> {
    SearchPagination::from_params(params.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .map_err(|err| match err {
            PaginationError::UnsupportedParameter { key } => {
                Error::invalid_argument("unsupported paging parameter", key)
            }
            PaginationError::InvalidValue { key, value } => {
                Error::invalid_argument("invalid paging parameter", format!("{key}: {value:?}"))
            }
            PaginationError::OutOfRange { page, size } => Error::invalid_argument(
                "invalid paging parameter",
                format!("number: \"{page}\", size: \"{size}\": exceeds the supported range"),
            ),
        })
}

#[cfg(test)]
mod tests {
    //! Extraction rules exercised with a small test strategy.

    use super::*;
    use crate::domain::GenericCode;
    use rstest::{fixture, rstest};

    /// Accepts `name` (kept verbatim) and `count` (single unsigned integer).
    struct TestStrategy;

    #[derive(Debug, PartialEq, Eq)]
    enum TestValue {
        Names(Vec<String>),
        Count(u32),
    }

    impl FilterStrategy for TestStrategy {
        type Value = TestValue;

        fn parse(&self, field: &str, values: &[String]) -> Result<TestValue, Error> {
            match field {
                "name" => Ok(TestValue::Names(values.to_vec())),
                "count" => values
                    .first()
                    .and_then(|raw| raw.parse().ok())
                    .map(TestValue::Count)
                    .ok_or_else(|| Error::invalid_argument("not a count", "expected integer")),
                other => Err(Error::invalid_argument("unsupported filter parameter", other)),
            }
        }
    }

    fn params(pairs: &[(&str, &[&str])]) -> QueryParams {
        pairs
            .iter()
            .map(|(key, values)| {
                (
                    (*key).to_owned(),
                    values.iter().map(|v| (*v).to_owned()).collect(),
                )
            })
            .collect()
    }

    #[fixture]
    fn strategy() -> TestStrategy {
        TestStrategy
    }

    #[rstest]
    fn recognised_fields_are_parsed_and_page_keys_skipped(strategy: TestStrategy) {
        let raw = params(&[
            ("filter[name]", &["a", "b"]),
            ("filter[count]", &["3"]),
            ("page[number]", &["1"]),
            ("page[size]", &["10"]),
        ]);
        let filter = extract_search_filter(&raw, &strategy).expect("valid filter");

        assert_eq!(filter.len(), 2);
        assert_eq!(
            filter.get("name"),
            Some(&TestValue::Names(vec!["a".to_owned(), "b".to_owned()]))
        );
        assert_eq!(filter.get("count"), Some(&TestValue::Count(3)));
    }

    #[rstest]
    fn empty_params_produce_empty_filter(strategy: TestStrategy) {
        let filter = extract_search_filter(&QueryParams::new(), &strategy).expect("empty filter");
        assert!(filter.is_empty());
    }

    #[rstest]
    #[case("name")]
    #[case("filter[]")]
    #[case("filter[name")]
    #[case("filters[name]")]
    #[case("filter[na-me]")]
    #[case("page[]")]
    fn malformed_keys_are_rejected(strategy: TestStrategy, #[case] key: &str) {
        let err = extract_search_filter(&params(&[(key, &["x"])]), &strategy)
            .expect_err("malformed key");
        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.message(), "invalid query parameter");
        assert_eq!(err.detail(), key);
    }

    #[rstest]
    fn unknown_field_is_rewrapped(strategy: TestStrategy) {
        let err = extract_search_filter(&params(&[("filter[unknown]", &["x"])]), &strategy)
            .expect_err("unknown field");
        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.message(), "invalid filter parameter");
        assert!(err.detail().starts_with("field \"unknown\""));
        assert!(err.detail().contains("unsupported filter parameter"));
    }

    #[rstest]
    fn malformed_value_names_the_field(strategy: TestStrategy) {
        let err = extract_search_filter(&params(&[("filter[count]", &["many"])]), &strategy)
            .expect_err("bad count");
        assert_eq!(err.message(), "invalid filter parameter");
        assert_eq!(err.detail(), "field \"count\": not a count: expected integer");
    }

    #[rstest]
    fn nested_field_names_keep_their_dots() {
        struct Echo;
        impl FilterStrategy for Echo {
            type Value = String;
            fn parse(&self, field: &str, _values: &[String]) -> Result<String, Error> {
                Ok(field.to_owned())
            }
        }
        let raw = params(&[("filter[debtor.account_number]", &["1"])]);
        let filter = extract_search_filter(&raw, &Echo).expect("dotted field");
        assert_eq!(
            filter.get("debtor.account_number").map(String::as_str),
            Some("debtor.account_number")
        );
    }

    #[rstest]
    fn page_params_strip_brackets_and_ignore_filters() {
        let raw = params(&[
            ("filter[name]", &["a"]),
            ("page[number]", &["2", "9"]),
            ("page[size]", &["5"]),
        ]);
        let collected = page_params(&raw).expect("page params present");
        assert_eq!(collected.get("number").map(String::as_str), Some("2"));
        assert_eq!(collected.get("size").map(String::as_str), Some("5"));
        assert_eq!(collected.len(), 2);
    }

    #[rstest]
    fn page_params_absent_without_page_keys() {
        assert!(page_params(&params(&[("filter[name]", &["a"])])).is_none());
    }

    #[rstest]
    fn pagination_defaults_when_empty() {
        let pagination = extract_pagination(&PageParams::new()).expect("defaults");
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.size(), 100);
    }

    #[rstest]
    fn pagination_honours_explicit_values() {
        let raw = PageParams::from([
            ("number".to_owned(), "5".to_owned()),
            ("size".to_owned(), "10".to_owned()),
        ]);
        let pagination = extract_pagination(&raw).expect("explicit");
        assert_eq!((pagination.page(), pagination.size()), (5, 10));
        assert_eq!((pagination.offset(), pagination.limit()), (40, 10));
    }

    #[rstest]
    #[case("number", "0")]
    #[case("size", "0")]
    #[case("number", "abc")]
    #[case("size", "")]
    #[case("size", "+5")]
    fn pagination_rejects_zero_and_garbage(#[case] key: &str, #[case] value: &str) {
        let raw = PageParams::from([(key.to_owned(), value.to_owned())]);
        let err = extract_pagination(&raw).expect_err("invalid value");
        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.message(), "invalid paging parameter");
        assert!(err.detail().starts_with(key));
    }

    #[rstest]
    fn pagination_rejects_pages_beyond_the_store_range() {
        let raw = PageParams::from([("number".to_owned(), "99999999999999999".to_owned())]);
        let err = extract_pagination(&raw).expect_err("page too far");
        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.message(), "invalid paging parameter");
        assert!(err.detail().contains("99999999999999999"));
    }

    #[rstest]
    fn pagination_rejects_unknown_keys() {
        let raw = PageParams::from([("offset".to_owned(), "10".to_owned())]);
        let err = extract_pagination(&raw).expect_err("unsupported key");
        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.message(), "unsupported paging parameter");
        assert_eq!(err.detail(), "offset");
    }
}
