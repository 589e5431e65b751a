//! Payment HTTP handlers.
//!
//! ```text
//! GET    /v1/payments
//! GET    /v1/payments/{id}
//! POST   /v1/payments
//! PATCH  /v1/payments/{id}
//! DELETE /v1/payments/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::Paginated;
use url::Url;

use crate::domain::{Error, PaymentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorDocument;
use crate::inbound::http::payments_dto::{
    PaymentDocument, PaymentListResponse, PaymentRequest, PaymentResponse,
};
use crate::inbound::http::query::{payment_search_request, query_params};
use crate::inbound::http::state::HttpState;

fn parse_payment_id(raw: &str) -> Result<PaymentId, Error> {
    raw.parse()
}

/// Absolute URL of the current request, used as the base of page links.
fn request_url(request: &HttpRequest) -> Result<Url, Error> {
    let info = request.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), request.uri());
    Url::parse(&raw).map_err(|err| Error::internal("Internal Server Error", err.to_string()))
}

/// Search payments.
#[utoipa::path(
    get,
    path = "/v1/payments",
    description = "List payments matching `filter[...]` parameters. Supplying any \
        `page[number]` or `page[size]` parameter paginates the result and adds \
        `meta` and `links`.",
    params(
        ("filter[id]" = Option<String>, Query, description = "Comma-separated payment identifiers"),
        ("filter[creditor.account_number]" = Option<String>, Query, description = "Comma-separated creditor account numbers"),
        ("filter[debtor.account_number]" = Option<String>, Query, description = "Comma-separated debtor account numbers"),
        ("page[number]" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("page[size]" = Option<u64>, Query, description = "Page size, default 100")
    ),
    responses(
        (status = 200, description = "Matching payments", body = PaymentListResponse),
        (status = 400, description = "Invalid query parameter", body = ErrorDocument),
        (status = 500, description = "Internal server error", body = ErrorDocument)
    ),
    tags = ["payments"],
    operation_id = "searchPayments"
)]
#[get("/payments")]
pub async fn search_payments(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<web::Json<PaymentListResponse>> {
    let search = payment_search_request(&query_params(request.query_string()))?;
    let pagination = search.pagination;
    let response = state.payments_query.search(search).await?;
    let data: Vec<PaymentDocument> = response.data.into_iter().map(Into::into).collect();

    let body: PaymentListResponse = match (pagination, response.total) {
        (Some(pagination), Some(total)) => {
            let base = request_url(&request)?;
            Paginated::new(data, pagination, total, &base).into()
        }
        _ => PaymentListResponse::unpaged(data),
    };
    Ok(web::Json(body))
}

/// Load one payment.
#[utoipa::path(
    get,
    path = "/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "The payment", body = PaymentResponse),
        (status = 400, description = "Invalid identifier", body = ErrorDocument),
        (status = 404, description = "Unknown payment", body = ErrorDocument),
        (status = 500, description = "Internal server error", body = ErrorDocument)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{id}")]
pub async fn load_payment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PaymentResponse>> {
    let id = parse_payment_id(&path)?;
    let payment = state.payments_query.load(id).await?;
    Ok(web::Json(PaymentResponse {
        data: payment.into(),
    }))
}

/// Create a payment under a client-assigned identifier.
#[utoipa::path(
    post,
    path = "/v1/payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Created payment", body = PaymentResponse),
        (status = 400, description = "Invalid payment", body = ErrorDocument),
        (status = 409, description = "Payment already exists", body = ErrorDocument),
        (status = 500, description = "Internal server error", body = ErrorDocument)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    payload: web::Json<PaymentRequest>,
) -> ApiResult<HttpResponse> {
    let payment = payload.into_inner().into_new_payment()?;
    let created = state.payments_command.create(payment).await?;
    Ok(HttpResponse::Created().json(PaymentResponse {
        data: created.into(),
    }))
}

/// Replace a payment's fields.
#[utoipa::path(
    patch,
    path = "/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Updated payment", body = PaymentResponse),
        (status = 400, description = "Invalid payment", body = ErrorDocument),
        (status = 404, description = "Unknown payment", body = ErrorDocument),
        (status = 500, description = "Internal server error", body = ErrorDocument)
    ),
    tags = ["payments"],
    operation_id = "updatePayment"
)]
#[patch("/payments/{id}")]
pub async fn update_payment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PaymentRequest>,
) -> ApiResult<web::Json<PaymentResponse>> {
    let id = parse_payment_id(&path)?;
    let payment = payload.into_inner().into_replacement(id)?;
    let updated = state.payments_command.update(payment).await?;
    Ok(web::Json(PaymentResponse {
        data: updated.into(),
    }))
}

/// Delete a payment. Deleting an unknown payment succeeds.
#[utoipa::path(
    delete,
    path = "/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorDocument),
        (status = 500, description = "Internal server error", body = ErrorDocument)
    ),
    tags = ["payments"],
    operation_id = "deletePayment"
)]
#[delete("/payments/{id}")]
pub async fn delete_payment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_payment_id(&path)?;
    state.payments_command.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
