//! Payment domain service.
//!
//! Implements the payment driving ports. Each operation runs as a single unit
//! of work inside one transaction opened by the [`TransactionCoordinator`].

use std::sync::Arc;

use async_trait::async_trait;
use scoped_futures::ScopedFutureExt;

use crate::domain::ports::{
    EnumRepository, PaymentRepository, PaymentsCommand, PaymentsQuery, TransactionProvider,
};
use crate::domain::{
    EnumName, Error, Payment, PaymentId, PaymentSearchRequest, PaymentSearchResponse,
    TransactionCoordinator,
};

/// Reference-data checks in the order they are reported.
fn enum_checks(payment: &Payment) -> [(EnumName, &str, &'static str); 4] {
    [
        (
            EnumName::Currency,
            payment.amount.currency.as_str(),
            "payment.amount.currency",
        ),
        (
            EnumName::Country,
            payment.creditor.address.country_code.as_str(),
            "payment.creditor.address.country_code",
        ),
        (
            EnumName::Country,
            payment.debtor.address.country_code.as_str(),
            "payment.debtor.address.country_code",
        ),
        (EnumName::Scheme, payment.scheme.as_str(), "payment.scheme"),
    ]
}

async fn validate_enums<Tx, E>(enums: &E, tx: &mut Tx, payment: &Payment) -> Result<(), Error>
where
    Tx: Send + Sync + 'static,
    E: EnumRepository<Tx> + ?Sized,
{
    for (name, code, field) in enum_checks(payment) {
        if !enums.exists(tx, name, code).await? {
            return Err(Error::invalid_argument("enum not found", field));
        }
    }
    Ok(())
}

/// Payment service implementing [`PaymentsQuery`] and [`PaymentsCommand`].
pub struct PaymentService<P, R, E> {
    transactions: TransactionCoordinator<P>,
    payments: Arc<R>,
    enums: Arc<E>,
}

impl<P, R, E> PaymentService<P, R, E> {
    /// Create a service over the given coordinator and repositories.
    pub const fn new(
        transactions: TransactionCoordinator<P>,
        payments: Arc<R>,
        enums: Arc<E>,
    ) -> Self {
        Self {
            transactions,
            payments,
            enums,
        }
    }
}

impl<P, R, E> Clone for PaymentService<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            transactions: self.transactions.clone(),
            payments: Arc::clone(&self.payments),
            enums: Arc::clone(&self.enums),
        }
    }
}

#[async_trait]
impl<P, R, E> PaymentsQuery for PaymentService<P, R, E>
where
    P: TransactionProvider,
    R: PaymentRepository<P::Handle>,
    E: EnumRepository<P::Handle>,
{
    async fn search(&self, request: PaymentSearchRequest) -> Result<PaymentSearchResponse, Error> {
        let payments = self.payments.as_ref();
        self.transactions
            .run(move |tx| {
                async move {
                    let PaymentSearchRequest { filter, pagination } = request;
                    let data = payments.find(tx, &filter, pagination).await?;
                    let total = match pagination {
                        Some(_) => Some(payments.count(tx, &filter).await?),
                        None => None,
                    };
                    Ok(PaymentSearchResponse { data, total })
                }
                .scope_boxed()
            })
            .await
    }

    async fn load(&self, id: PaymentId) -> Result<Payment, Error> {
        let payments = self.payments.as_ref();
        self.transactions
            .run(move |tx| async move { payments.get(tx, &id).await }.scope_boxed())
            .await
    }
}

#[async_trait]
impl<P, R, E> PaymentsCommand for PaymentService<P, R, E>
where
    P: TransactionProvider,
    R: PaymentRepository<P::Handle>,
    E: EnumRepository<P::Handle>,
{
    async fn create(&self, payment: Payment) -> Result<Payment, Error> {
        payment.validate()?;
        let (payments, enums) = (self.payments.as_ref(), self.enums.as_ref());
        self.transactions
            .run(move |tx| {
                async move {
                    validate_enums(enums, tx, &payment).await?;
                    payments.insert(tx, &payment).await?;
                    Ok(payment)
                }
                .scope_boxed()
            })
            .await
    }

    async fn update(&self, payment: Payment) -> Result<Payment, Error> {
        let (payments, enums) = (self.payments.as_ref(), self.enums.as_ref());
        self.transactions
            .run(move |tx| {
                async move {
                    validate_enums(enums, tx, &payment).await?;
                    payments.update(tx, &payment).await?;
                    Ok(payment)
                }
                .scope_boxed()
            })
            .await
    }

    async fn delete(&self, id: PaymentId) -> Result<(), Error> {
        let payments = self.payments.as_ref();
        self.transactions
            .run(move |tx| async move { payments.delete(tx, &id).await }.scope_boxed())
            .await
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
