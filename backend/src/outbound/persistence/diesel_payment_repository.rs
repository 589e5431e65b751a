//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! Statements run on the connection owned by the caller's
//! [`DieselTransaction`]; this adapter never opens or releases transactions.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SearchPagination;
use uuid::Uuid;

use crate::domain::ports::PaymentRepository;
use crate::domain::{DataAccessCode, Error, Payment, PaymentFilter, PaymentId};

use super::diesel_transaction::DieselTransaction;
use super::models::PaymentRow;
use super::schema::payment;
use super::storage_error::{StorageOperation, translate};

const COUNT_FAILED: &str = "unable to count payments";
const FIND_FAILED: &str = "unable to find payments";
const GET_FAILED: &str = "unable to get payment";
const INSERT_FAILED: &str = "unable to insert payment";
const UPDATE_FAILED: &str = "unable to update payment";
const DELETE_FAILED: &str = "unable to delete payment";

/// Narrow a boxed `payment` query with `= ANY` conditions for each filter
/// field that carries values.
macro_rules! apply_payment_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        let filter: &PaymentFilter = $filter;

        if !filter.ids().is_empty() {
            let ids: Vec<Uuid> = filter.ids().iter().map(|id| *id.as_uuid()).collect();
            query = query.filter(payment::id.eq_any(ids));
        }
        if !filter.creditor_account_numbers().is_empty() {
            query = query.filter(
                payment::creditor_account_number
                    .eq_any(filter.creditor_account_numbers().to_vec()),
            );
        }
        if !filter.debtor_account_numbers().is_empty() {
            query = query.filter(
                payment::debtor_account_number.eq_any(filter.debtor_account_numbers().to_vec()),
            );
        }
        query
    }};
}

/// LIMIT and OFFSET for one page, in the integer type PostgreSQL expects.
fn page_window(pagination: SearchPagination) -> Result<(i64, i64), Error> {
    let out_of_range = || {
        Error::data_access(
            DataAccessCode::SelectFailed,
            FIND_FAILED,
            format!(
                "page {} of size {} exceeds the supported range",
                pagination.page(),
                pagination.size()
            ),
        )
    };
    let limit = i64::try_from(pagination.limit()).map_err(|_| out_of_range())?;
    let offset = i64::try_from(pagination.offset()).map_err(|_| out_of_range())?;
    Ok((limit, offset))
}

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Debug, Clone, Copy, Default)]
pub struct DieselPaymentRepository;

impl DieselPaymentRepository {
    /// Create a new repository.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentRepository<DieselTransaction> for DieselPaymentRepository {
    async fn count(&self, tx: &mut DieselTransaction, filter: &PaymentFilter) -> Result<u64, Error> {
        let query = apply_payment_filter!(
            payment::table.select(diesel::dsl::count_star()).into_boxed(),
            filter
        );
        let total = translate(
            StorageOperation::Select,
            query.get_result::<i64>(tx.connection()).await,
            COUNT_FAILED,
        )?;

        u64::try_from(total).map_err(|_| {
            Error::data_access(
                DataAccessCode::SelectFailed,
                COUNT_FAILED,
                format!("negative row count {total}"),
            )
        })
    }

    async fn find(
        &self,
        tx: &mut DieselTransaction,
        filter: &PaymentFilter,
        pagination: Option<SearchPagination>,
    ) -> Result<Vec<Payment>, Error> {
        let mut query = apply_payment_filter!(
            payment::table
                .select(PaymentRow::as_select())
                .order(payment::id.asc())
                .into_boxed(),
            filter
        );
        if let Some(pagination) = pagination {
            let (limit, offset) = page_window(pagination)?;
            query = query.limit(limit).offset(offset);
        }

        let rows = translate(
            StorageOperation::Select,
            query.load::<PaymentRow>(tx.connection()).await,
            FIND_FAILED,
        )?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn get(&self, tx: &mut DieselTransaction, id: &PaymentId) -> Result<Payment, Error> {
        let row = translate(
            StorageOperation::Select,
            payment::table
                .find(id.as_uuid())
                .select(PaymentRow::as_select())
                .first::<PaymentRow>(tx.connection())
                .await,
            GET_FAILED,
        )?;
        Ok(Payment::from(row))
    }

    async fn insert(&self, tx: &mut DieselTransaction, payment: &Payment) -> Result<(), Error> {
        let row = PaymentRow::from(payment);
        translate(
            StorageOperation::Insert,
            diesel::insert_into(payment::table)
                .values(&row)
                .execute(tx.connection())
                .await,
            INSERT_FAILED,
        )
        .map(|_| ())
    }

    async fn update(&self, tx: &mut DieselTransaction, payment: &Payment) -> Result<(), Error> {
        let row = PaymentRow::from(payment);
        let updated = diesel::update(payment::table.find(row.id))
            .set(&row)
            .execute(tx.connection())
            .await
            .and_then(|affected| {
                if affected == 0 {
                    Err(diesel::result::Error::NotFound)
                } else {
                    Ok(())
                }
            });
        translate(StorageOperation::Update, updated, UPDATE_FAILED)
    }

    async fn delete(&self, tx: &mut DieselTransaction, id: &PaymentId) -> Result<(), Error> {
        // Deleting an absent payment succeeds.
        translate(
            StorageOperation::Delete,
            diesel::delete(payment::table.find(id.as_uuid()))
                .execute(tx.connection())
                .await,
            DELETE_FAILED,
        )
        .map(|_| ())
    }
}
