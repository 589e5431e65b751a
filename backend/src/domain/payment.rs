//! Payment aggregate and its reference-data vocabulary.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::Error;

const INVALID_PAYMENT: &str = "invalid payment";

/// Payment identifier.
///
/// # Examples
/// ```
/// use payments::domain::PaymentId;
///
/// let id: PaymentId = "33b5c07b-6a3c-4c4a-9d53-7a2f54d0f1a1".parse().expect("valid id");
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether this is the all-zero identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl FromStr for PaymentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|err| Error::invalid_argument("invalid format of ID", err.to_string()))
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<PaymentId> for Uuid {
    fn from(value: PaymentId) -> Self {
        value.0
    }
}

/// Monetary amount in a named currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monetary {
    /// Decimal amount.
    pub value: BigDecimal,
    /// ISO currency code, checked against the currency reference set.
    pub currency: String,
}

/// Postal address of a payment party.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// First address line.
    pub line1: String,
    /// Optional second address line.
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// Optional region or state.
    pub region: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// Country code, checked against the country reference set.
    pub country_code: String,
}

/// Institution servicing a party's account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountProvider {
    /// Provider code (for example a sort code or BIC).
    pub code: String,
    /// Optional provider display name.
    pub name: Option<String>,
}

/// Creditor or debtor of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentParty {
    /// Party name.
    pub name: String,
    /// Party address.
    pub address: Address,
    /// Name on the account.
    pub account_name: String,
    /// Account number.
    pub account_number: String,
    /// Account servicing institution.
    pub account_provider: AccountProvider,
}

/// A payment between two parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Identifier, supplied by the client.
    pub id: PaymentId,
    /// Amount and currency.
    pub amount: Monetary,
    /// Receiving party.
    pub creditor: PaymentParty,
    /// Paying party.
    pub debtor: PaymentParty,
    /// Payment scheme code, checked against the scheme reference set.
    pub scheme: String,
}

impl Payment {
    /// Check the fields every stored payment must carry.
    ///
    /// Checks run in a fixed order and stop at the first failure: id, scheme,
    /// currency, creditor account number, debtor account number. Reference
    /// data membership is not checked here.
    ///
    /// # Errors
    /// Returns an `INVALID_ARGUMENT` error whose detail names the missing field.
    pub fn validate(&self) -> Result<(), Error> {
        let failure = if self.id.is_nil() {
            "payment id must not be nil"
        } else if self.scheme.is_empty() {
            "invalid payment scheme"
        } else if self.amount.currency.is_empty() {
            "invalid amount currency code"
        } else if self.creditor.account_number.is_empty() {
            "invalid creditor account number"
        } else if self.debtor.account_number.is_empty() {
            "invalid debtor account number"
        } else {
            return Ok(());
        };
        Err(Error::invalid_argument(INVALID_PAYMENT, failure))
    }
}

/// Reference sets that enumerated payment fields must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumName {
    /// Currency codes.
    Currency,
    /// Country codes.
    Country,
    /// Payment scheme codes.
    Scheme,
}

impl EnumName {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Country => "country",
            Self::Scheme => "scheme",
        }
    }
}

impl fmt::Display for EnumName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
