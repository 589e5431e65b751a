//! JSON documents exchanged by the payment endpoints.
//!
//! Amounts travel as decimal strings so no precision is lost in transit.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use pagination::{PageLinks, PageMeta, Paginated};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AccountProvider, Address, Error, Monetary, Payment, PaymentId, PaymentParty,
};

/// Postal address of a payment party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressDocument {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166 alpha-2 code.
    #[schema(example = "GB")]
    pub country_code: String,
}

/// Institution holding a party's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountProviderDocument {
    #[schema(example = "400300")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Creditor or debtor of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartyDocument {
    pub name: String,
    pub address: AddressDocument,
    pub account_name: String,
    #[schema(example = "31926819")]
    pub account_number: String,
    pub account_provider: AccountProviderDocument,
}

/// Amount and currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonetaryDocument {
    /// Decimal amount.
    #[schema(example = "100.21")]
    pub value: String,
    /// ISO 4217 code.
    #[schema(example = "GBP")]
    pub currency: String,
}

/// Payment fields other than the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentAttributes {
    pub amount: MonetaryDocument,
    pub creditor: PartyDocument,
    pub debtor: PartyDocument,
    #[schema(example = "FPS")]
    pub scheme: String,
}

/// Body accepted by create and update.
///
/// Create takes the identifier from the body; update takes it from the path
/// and only checks that a body identifier, if sent, agrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub attributes: PaymentAttributes,
}

/// A payment as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentDocument {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[serde(flatten)]
    pub attributes: PaymentAttributes,
}

/// Single-payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub data: PaymentDocument,
}

/// Search response; `meta` and `links` appear only for paginated searches.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentListResponse {
    pub data: Vec<PaymentDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub links: Option<PageLinks>,
}

impl PaymentListResponse {
    /// An unpaginated result.
    pub fn unpaged(data: Vec<PaymentDocument>) -> Self {
        Self {
            data,
            meta: None,
            links: None,
        }
    }
}

impl From<Paginated<PaymentDocument>> for PaymentListResponse {
    fn from(page: Paginated<PaymentDocument>) -> Self {
        Self {
            data: page.data,
            meta: Some(page.meta),
            links: Some(page.links),
        }
    }
}

fn parse_amount(value: &str) -> Result<BigDecimal, Error> {
    BigDecimal::from_str(value.trim())
        .map_err(|err| Error::invalid_argument("invalid format of decimal", err.to_string()))
}

impl From<AddressDocument> for Address {
    fn from(doc: AddressDocument) -> Self {
        Self {
            line1: doc.line1,
            line2: doc.line2,
            city: doc.city,
            region: doc.region,
            postal_code: doc.postal_code,
            country_code: doc.country_code,
        }
    }
}

impl From<Address> for AddressDocument {
    fn from(address: Address) -> Self {
        Self {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            region: address.region,
            postal_code: address.postal_code,
            country_code: address.country_code,
        }
    }
}

impl From<PartyDocument> for PaymentParty {
    fn from(doc: PartyDocument) -> Self {
        Self {
            name: doc.name,
            address: doc.address.into(),
            account_name: doc.account_name,
            account_number: doc.account_number,
            account_provider: AccountProvider {
                code: doc.account_provider.code,
                name: doc.account_provider.name,
            },
        }
    }
}

impl From<PaymentParty> for PartyDocument {
    fn from(party: PaymentParty) -> Self {
        Self {
            name: party.name,
            address: party.address.into(),
            account_name: party.account_name,
            account_number: party.account_number,
            account_provider: AccountProviderDocument {
                code: party.account_provider.code,
                name: party.account_provider.name,
            },
        }
    }
}

impl PaymentAttributes {
    /// Build a domain payment under `id`.
    ///
    /// # Errors
    /// `INVALID_ARGUMENT` "invalid format of decimal" when the amount does not
    /// parse.
    pub fn into_payment(self, id: PaymentId) -> Result<Payment, Error> {
        Ok(Payment {
            id,
            amount: Monetary {
                value: parse_amount(&self.amount.value)?,
                currency: self.amount.currency,
            },
            creditor: self.creditor.into(),
            debtor: self.debtor.into(),
            scheme: self.scheme,
        })
    }
}

impl PaymentRequest {
    /// Payment for a create request; a missing identifier is left nil so
    /// validation reports it.
    pub fn into_new_payment(self) -> Result<Payment, Error> {
        let id = PaymentId::from_uuid(self.id.unwrap_or_default());
        self.attributes.into_payment(id)
    }

    /// Payment for an update of the resource at `path_id`.
    ///
    /// # Errors
    /// `INVALID_ARGUMENT` when the body names a different payment.
    pub fn into_replacement(self, path_id: PaymentId) -> Result<Payment, Error> {
        match self.id {
            Some(body_id) if body_id != *path_id.as_uuid() => Err(Error::invalid_argument(
                "invalid payment",
                format!("body id {body_id} does not match path id {path_id}"),
            )),
            _ => self.attributes.into_payment(path_id),
        }
    }
}

impl From<Payment> for PaymentDocument {
    fn from(payment: Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            attributes: PaymentAttributes {
                amount: MonetaryDocument {
                    value: payment.amount.value.to_string(),
                    currency: payment.amount.currency,
                },
                creditor: payment.creditor.into(),
                debtor: payment.debtor.into(),
                scheme: payment.scheme,
            },
        }
    }
}
