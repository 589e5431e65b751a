//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate them with `diesel print-schema` when the migrations change.

diesel::table! {
    /// Payment resources.
    ///
    /// Creditor and debtor parties are flattened into prefixed columns.
    payment (id) {
        /// Primary key: client-assigned UUID.
        id -> Uuid,
        amount_value -> Numeric,
        /// ISO 4217 code, references `enum_currency`.
        amount_currency -> Varchar,
        /// References `enum_scheme`.
        scheme_type -> Varchar,
        creditor_name -> Varchar,
        creditor_account_name -> Varchar,
        creditor_account_number -> Varchar,
        creditor_account_provider_code -> Varchar,
        creditor_account_provider_name -> Nullable<Varchar>,
        creditor_address_line1 -> Varchar,
        creditor_address_line2 -> Nullable<Varchar>,
        creditor_address_city -> Varchar,
        creditor_address_region -> Nullable<Varchar>,
        creditor_address_postal_code -> Varchar,
        /// References `enum_country`.
        creditor_address_country_code -> Varchar,
        debtor_name -> Varchar,
        debtor_account_name -> Varchar,
        debtor_account_number -> Varchar,
        debtor_account_provider_code -> Varchar,
        debtor_account_provider_name -> Nullable<Varchar>,
        debtor_address_line1 -> Varchar,
        debtor_address_line2 -> Nullable<Varchar>,
        debtor_address_city -> Varchar,
        debtor_address_region -> Nullable<Varchar>,
        debtor_address_postal_code -> Varchar,
        /// References `enum_country`.
        debtor_address_country_code -> Varchar,
    }
}

diesel::table! {
    /// ISO 4217 currency codes accepted on payments.
    enum_currency (code) {
        code -> Varchar,
    }
}

diesel::table! {
    /// ISO 3166 alpha-2 country codes accepted on addresses.
    enum_country (code) {
        code -> Varchar,
    }
}

diesel::table! {
    /// Payment schemes accepted on payments.
    enum_scheme (code) {
        code -> Varchar,
    }
}
