//! Payments resource service.
//!
//! The [`domain`] holds payments, the error taxonomy, search parameter
//! extraction, the transaction coordinator and the payment service. Adapters
//! in [`inbound`] and [`outbound`] connect it to HTTP and PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::RequestTracing;
