//! Driving port for payment writes.

use async_trait::async_trait;

use crate::domain::{Error, Payment, PaymentId};

/// Write operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsCommand: Send + Sync {
    /// Validate and store a new payment, returning it as stored.
    async fn create(&self, payment: Payment) -> Result<Payment, Error>;

    /// Validate and replace an existing payment, returning it as stored.
    async fn update(&self, payment: Payment) -> Result<Payment, Error>;

    /// Remove a payment; removing an absent payment succeeds.
    async fn delete(&self, id: PaymentId) -> Result<(), Error>;
}
