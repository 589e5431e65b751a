//! Wiring of domain services onto the Diesel adapters.

use std::sync::Arc;

use payments::domain::{PaymentService, TransactionCoordinator};
use payments::inbound::http::state::HttpState;
use payments::outbound::persistence::{
    DbPool, DieselEnumRepository, DieselPaymentRepository, DieselTransactionProvider,
};

/// Build handler state with a PostgreSQL-backed payment service.
pub(crate) fn build_http_state(pool: &DbPool) -> HttpState {
    let service = PaymentService::new(
        TransactionCoordinator::new(Arc::new(DieselTransactionProvider::new(pool.clone()))),
        Arc::new(DieselPaymentRepository::new()),
        Arc::new(DieselEnumRepository::new()),
    );
    HttpState::new(Arc::new(service.clone()), Arc::new(service))
}
