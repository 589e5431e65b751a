//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PaymentsCommand, PaymentsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub payments_query: Arc<dyn PaymentsQuery>,
    pub payments_command: Arc<dyn PaymentsCommand>,
}

impl HttpState {
    /// Bundle the payment ports.
    pub fn new(
        payments_query: Arc<dyn PaymentsQuery>,
        payments_command: Arc<dyn PaymentsCommand>,
    ) -> Self {
        Self {
            payments_query,
            payments_command,
        }
    }
}
