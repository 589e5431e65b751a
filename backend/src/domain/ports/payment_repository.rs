//! Port for payment persistence inside a transaction.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use pagination::SearchPagination;

use crate::domain::{Error, Payment, PaymentFilter, PaymentId};

/// Port for reading and writing payments through a transaction handle `Tx`.
///
/// Adapters translate their own failures into categorised errors before
/// returning: a missing row is `NOT_FOUND`, a duplicate insert is
/// `ALREADY_EXISTS`, anything else is the matching `*_FAILED` code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository<Tx: Send + Sync + 'static>: Send + Sync {
    /// Count payments matching `filter`.
    async fn count(&self, tx: &mut Tx, filter: &PaymentFilter) -> Result<u64, Error>;

    /// Find payments matching `filter`, restricted to `pagination` when given.
    async fn find(
        &self,
        tx: &mut Tx,
        filter: &PaymentFilter,
        pagination: Option<SearchPagination>,
    ) -> Result<Vec<Payment>, Error>;

    /// Load one payment; `NOT_FOUND` when absent.
    async fn get(&self, tx: &mut Tx, id: &PaymentId) -> Result<Payment, Error>;

    /// Store a new payment; `ALREADY_EXISTS` when the id is taken.
    async fn insert(&self, tx: &mut Tx, payment: &Payment) -> Result<(), Error>;

    /// Replace an existing payment; `NOT_FOUND` when absent.
    async fn update(&self, tx: &mut Tx, payment: &Payment) -> Result<(), Error>;

    /// Remove a payment. Removing an absent payment succeeds.
    async fn delete(&self, tx: &mut Tx, id: &PaymentId) -> Result<(), Error>;
}

/// In-memory repository for tests and local wiring.
///
/// Ignores the transaction handle: writes are visible immediately and are not
/// undone by a rollback.
#[derive(Debug, Default)]
pub struct FixturePaymentRepository {
    payments: Mutex<BTreeMap<PaymentId, Payment>>,
}

impl FixturePaymentRepository {
    /// Repository pre-populated with `payments`.
    pub fn with_payments(payments: impl IntoIterator<Item = Payment>) -> Self {
        Self {
            payments: Mutex::new(
                payments
                    .into_iter()
                    .map(|payment| (payment.id, payment))
                    .collect(),
            ),
        }
    }

    fn matching(&self, filter: &PaymentFilter) -> Vec<Payment> {
        let payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        payments
            .values()
            .filter(|payment| matches(filter, payment))
            .cloned()
            .collect()
    }
}

fn matches(filter: &PaymentFilter, payment: &Payment) -> bool {
    let admits = |allowed: &[String], value: &String| allowed.is_empty() || allowed.contains(value);
    (filter.ids().is_empty() || filter.ids().contains(&payment.id))
        && admits(
            filter.creditor_account_numbers(),
            &payment.creditor.account_number,
        )
        && admits(filter.debtor_account_numbers(), &payment.debtor.account_number)
}

#[async_trait]
impl<Tx: Send + Sync + 'static> PaymentRepository<Tx> for FixturePaymentRepository {
    async fn count(&self, _tx: &mut Tx, filter: &PaymentFilter) -> Result<u64, Error> {
        u64::try_from(self.matching(filter).len())
            .map_err(|err| Error::internal("unable to count payments", err.to_string()))
    }

    async fn find(
        &self,
        _tx: &mut Tx,
        filter: &PaymentFilter,
        pagination: Option<SearchPagination>,
    ) -> Result<Vec<Payment>, Error> {
        let found = self.matching(filter);
        let Some(page) = pagination else {
            return Ok(found);
        };
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(skip).take(take).collect())
    }

    async fn get(&self, _tx: &mut Tx, id: &PaymentId) -> Result<Payment, Error> {
        let payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        payments
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("unable to get payment", "no rows in result set"))
    }

    async fn insert(&self, _tx: &mut Tx, payment: &Payment) -> Result<(), Error> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        if payments.contains_key(&payment.id) {
            return Err(Error::already_exists(
                "unable to insert payment",
                "duplicate key value violates unique constraint",
            ));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update(&self, _tx: &mut Tx, payment: &Payment) -> Result<(), Error> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = payments.get_mut(&payment.id) else {
            return Err(Error::not_found("unable to update payment", "no rows affected"));
        };
        *stored = payment.clone();
        Ok(())
    }

    async fn delete(&self, _tx: &mut Tx, id: &PaymentId) -> Result<(), Error> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        payments.remove(id);
        Ok(())
    }
}
