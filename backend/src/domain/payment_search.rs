//! Payment search criteria, results, and the filter strategy that builds them.

use pagination::SearchPagination;

use super::search::{FilterStrategy, SearchFilter};
use super::{Error, Payment, PaymentId};

/// Filter field selecting payments by identifier.
pub const ID_FIELD: &str = "id";
/// Filter field selecting payments by creditor account number.
pub const CREDITOR_ACCOUNT_NUMBER_FIELD: &str = "creditor.account_number";
/// Filter field selecting payments by debtor account number.
pub const DEBTOR_ACCOUNT_NUMBER_FIELD: &str = "debtor.account_number";

/// Typed value of a payment filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFilterValue {
    /// Any of these identifiers.
    Ids(Vec<PaymentId>),
    /// Any of these account numbers.
    AccountNumbers(Vec<String>),
}

/// Search criteria over payments.
pub type PaymentFilter = SearchFilter<PaymentFilterValue>;

impl SearchFilter<PaymentFilterValue> {
    /// Identifiers to match; empty when unconstrained.
    #[must_use]
    pub fn ids(&self) -> &[PaymentId] {
        match self.get(ID_FIELD) {
            Some(PaymentFilterValue::Ids(ids)) => ids,
            _ => &[],
        }
    }

    /// Creditor account numbers to match; empty when unconstrained.
    #[must_use]
    pub fn creditor_account_numbers(&self) -> &[String] {
        self.account_numbers(CREDITOR_ACCOUNT_NUMBER_FIELD)
    }

    /// Debtor account numbers to match; empty when unconstrained.
    #[must_use]
    pub fn debtor_account_numbers(&self) -> &[String] {
        self.account_numbers(DEBTOR_ACCOUNT_NUMBER_FIELD)
    }

    fn account_numbers(&self, field: &str) -> &[String] {
        match self.get(field) {
            Some(PaymentFilterValue::AccountNumbers(numbers)) => numbers,
            _ => &[],
        }
    }
}

/// Parses payment filter fields.
///
/// # Examples
/// ```
/// use payments::domain::search::FilterStrategy;
/// use payments::domain::{PaymentFilterStrategy, PaymentFilterValue};
///
/// let value = PaymentFilterStrategy
///     .parse("creditor.account_number", &["31926819".to_owned()])
///     .expect("known field");
/// assert_eq!(value, PaymentFilterValue::AccountNumbers(vec!["31926819".to_owned()]));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PaymentFilterStrategy;

impl FilterStrategy for PaymentFilterStrategy {
    type Value = PaymentFilterValue;

    fn parse(&self, field: &str, values: &[String]) -> Result<PaymentFilterValue, Error> {
        match field {
            ID_FIELD => values
                .iter()
                .enumerate()
                .map(|(index, raw)| {
                    raw.parse::<PaymentId>().map_err(|err| {
                        Error::invalid_argument(
                            err.message(),
                            format!("field {field:?}: index {index}: {raw:?} has invalid format"),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PaymentFilterValue::Ids),
            CREDITOR_ACCOUNT_NUMBER_FIELD | DEBTOR_ACCOUNT_NUMBER_FIELD => {
                Ok(PaymentFilterValue::AccountNumbers(values.to_vec()))
            }
            other => Err(Error::invalid_argument("unsupported filter parameter", other)),
        }
    }
}

/// A payment search: criteria plus an optional page window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentSearchRequest {
    /// Criteria every returned payment satisfies.
    pub filter: PaymentFilter,
    /// Page window; `None` returns every match.
    pub pagination: Option<SearchPagination>,
}

/// Result of a payment search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSearchResponse {
    /// Matching payments in the requested window.
    pub data: Vec<Payment>,
    /// Total number of matches, reported only for paginated searches.
    pub total: Option<u64>,
}
