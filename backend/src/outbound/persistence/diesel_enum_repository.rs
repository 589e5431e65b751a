//! PostgreSQL-backed `EnumRepository` over the reference code tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::EnumRepository;
use crate::domain::{EnumName, Error};

use super::diesel_transaction::DieselTransaction;
use super::schema::{enum_country, enum_currency, enum_scheme};
use super::storage_error::{StorageOperation, translate};

const CHECK_FAILED: &str = "unable to check enum";

/// Answers code membership from `enum_currency`, `enum_country` and
/// `enum_scheme`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DieselEnumRepository;

impl DieselEnumRepository {
    /// Create a new repository.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnumRepository<DieselTransaction> for DieselEnumRepository {
    async fn exists(
        &self,
        tx: &mut DieselTransaction,
        name: EnumName,
        code: &str,
    ) -> Result<bool, Error> {
        let conn = tx.connection();
        let count = match name {
            EnumName::Currency => {
                enum_currency::table
                    .filter(enum_currency::code.eq(code))
                    .count()
                    .get_result::<i64>(conn)
                    .await
            }
            EnumName::Country => {
                enum_country::table
                    .filter(enum_country::code.eq(code))
                    .count()
                    .get_result::<i64>(conn)
                    .await
            }
            EnumName::Scheme => {
                enum_scheme::table
                    .filter(enum_scheme::code.eq(code))
                    .count()
                    .get_result::<i64>(conn)
                    .await
            }
        };

        translate(StorageOperation::Select, count, CHECK_FAILED).map(|count| count > 0)
    }
}
