//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{AccountProvider, Address, Monetary, Payment, PaymentId, PaymentParty};

use super::schema::payment;

/// Flattened `payment` row used for reads, inserts and full updates.
///
/// The primary key is excluded from the changeset; `None` columns are written
/// as `NULL` so an update replaces optional fields too.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub amount_value: BigDecimal,
    pub amount_currency: String,
    pub scheme_type: String,
    pub creditor_name: String,
    pub creditor_account_name: String,
    pub creditor_account_number: String,
    pub creditor_account_provider_code: String,
    pub creditor_account_provider_name: Option<String>,
    pub creditor_address_line1: String,
    pub creditor_address_line2: Option<String>,
    pub creditor_address_city: String,
    pub creditor_address_region: Option<String>,
    pub creditor_address_postal_code: String,
    pub creditor_address_country_code: String,
    pub debtor_name: String,
    pub debtor_account_name: String,
    pub debtor_account_number: String,
    pub debtor_account_provider_code: String,
    pub debtor_account_provider_name: Option<String>,
    pub debtor_address_line1: String,
    pub debtor_address_line2: Option<String>,
    pub debtor_address_city: String,
    pub debtor_address_region: Option<String>,
    pub debtor_address_postal_code: String,
    pub debtor_address_country_code: String,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        let Payment {
            id,
            amount,
            creditor,
            debtor,
            scheme,
        } = payment;

        Self {
            id: *id.as_uuid(),
            amount_value: amount.value.clone(),
            amount_currency: amount.currency.clone(),
            scheme_type: scheme.clone(),
            creditor_name: creditor.name.clone(),
            creditor_account_name: creditor.account_name.clone(),
            creditor_account_number: creditor.account_number.clone(),
            creditor_account_provider_code: creditor.account_provider.code.clone(),
            creditor_account_provider_name: creditor.account_provider.name.clone(),
            creditor_address_line1: creditor.address.line1.clone(),
            creditor_address_line2: creditor.address.line2.clone(),
            creditor_address_city: creditor.address.city.clone(),
            creditor_address_region: creditor.address.region.clone(),
            creditor_address_postal_code: creditor.address.postal_code.clone(),
            creditor_address_country_code: creditor.address.country_code.clone(),
            debtor_name: debtor.name.clone(),
            debtor_account_name: debtor.account_name.clone(),
            debtor_account_number: debtor.account_number.clone(),
            debtor_account_provider_code: debtor.account_provider.code.clone(),
            debtor_account_provider_name: debtor.account_provider.name.clone(),
            debtor_address_line1: debtor.address.line1.clone(),
            debtor_address_line2: debtor.address.line2.clone(),
            debtor_address_city: debtor.address.city.clone(),
            debtor_address_region: debtor.address.region.clone(),
            debtor_address_postal_code: debtor.address.postal_code.clone(),
            debtor_address_country_code: debtor.address.country_code.clone(),
        }
    }
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: PaymentId::from_uuid(row.id),
            amount: Monetary {
                value: row.amount_value,
                currency: row.amount_currency,
            },
            creditor: PaymentParty {
                name: row.creditor_name,
                address: Address {
                    line1: row.creditor_address_line1,
                    line2: row.creditor_address_line2,
                    city: row.creditor_address_city,
                    region: row.creditor_address_region,
                    postal_code: row.creditor_address_postal_code,
                    country_code: row.creditor_address_country_code,
                },
                account_name: row.creditor_account_name,
                account_number: row.creditor_account_number,
                account_provider: AccountProvider {
                    code: row.creditor_account_provider_code,
                    name: row.creditor_account_provider_name,
                },
            },
            debtor: PaymentParty {
                name: row.debtor_name,
                address: Address {
                    line1: row.debtor_address_line1,
                    line2: row.debtor_address_line2,
                    city: row.debtor_address_city,
                    region: row.debtor_address_region,
                    postal_code: row.debtor_address_postal_code,
                    country_code: row.debtor_address_country_code,
                },
                account_name: row.debtor_account_name,
                account_number: row.debtor_account_number,
                account_provider: AccountProvider {
                    code: row.debtor_account_provider_code,
                    name: row.debtor_account_provider_name,
                },
            },
            scheme: row.scheme_type,
        }
    }
}
