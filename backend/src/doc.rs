//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the payment endpoints and their request, response and
//! error schemas. The document is served by Swagger UI when docs are enabled
//! and exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{DataAccessCode, GenericCode};
use crate::inbound::http::error::{ErrorDocument, ErrorObject};
use crate::inbound::http::payments_dto::{
    AccountProviderDocument, AddressDocument, MonetaryDocument, PartyDocument, PaymentAttributes,
    PaymentDocument, PaymentListResponse, PaymentRequest, PaymentResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payments API",
        description = "Create, search, update and delete payment resources."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::payments::search_payments,
        crate::inbound::http::payments::load_payment,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::update_payment,
        crate::inbound::http::payments::delete_payment,
    ),
    components(schemas(
        PaymentRequest,
        PaymentDocument,
        PaymentResponse,
        PaymentListResponse,
        PaymentAttributes,
        MonetaryDocument,
        PartyDocument,
        AddressDocument,
        AccountProviderDocument,
        ErrorDocument,
        ErrorObject,
        GenericCode,
        DataAccessCode,
    )),
    tags(
        (name = "payments", description = "Payment resources")
    )
)]
pub struct ApiDoc;
