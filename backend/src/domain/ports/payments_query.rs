//! Driving port for payment reads.

use async_trait::async_trait;

use crate::domain::{Error, Payment, PaymentId, PaymentSearchRequest, PaymentSearchResponse};

/// Read operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsQuery: Send + Sync {
    /// Search payments; the total is reported for paginated requests.
    async fn search(&self, request: PaymentSearchRequest) -> Result<PaymentSearchResponse, Error>;

    /// Load one payment; `NOT_FOUND` when absent.
    async fn load(&self, id: PaymentId) -> Result<Payment, Error>;
}
