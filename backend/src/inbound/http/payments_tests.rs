//! Tests for the payment handlers.
//!
//! Mocked ports pin the handler contract; the fixture-backed service checks
//! the wiring from HTTP through the transaction coordinator.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::App;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::payment::test_support::sample_payment;
use crate::domain::ports::{
    FixtureEnumRepository, FixturePaymentRepository, FixtureTransactionProvider, MockPaymentsCommand,
    MockPaymentsQuery, TransactionCounts,
};
use crate::domain::{
    DataAccessCode, Payment, PaymentSearchResponse, PaymentService, TransactionCoordinator,
};
use crate::inbound::http::error::json_error_handler;

fn payments_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/v1")
                .service(search_payments)
                .service(load_payment)
                .service(create_payment)
                .service(update_payment)
                .service(delete_payment),
        )
}

fn mocked_state(query: MockPaymentsQuery, command: MockPaymentsCommand) -> HttpState {
    HttpState::new(Arc::new(query), Arc::new(command))
}

struct FixtureWorld {
    state: HttpState,
    transactions: FixtureTransactionProvider,
}

fn fixture_world(payments: Vec<Payment>) -> FixtureWorld {
    let transactions = FixtureTransactionProvider::new();
    let service = PaymentService::new(
        TransactionCoordinator::new(Arc::new(transactions.clone())),
        Arc::new(FixturePaymentRepository::with_payments(payments)),
        Arc::new(FixtureEnumRepository::seeded()),
    );
    FixtureWorld {
        state: HttpState::new(Arc::new(service.clone()), Arc::new(service)),
        transactions,
    }
}

#[fixture]
fn payment() -> Payment {
    sample_payment()
}

fn body_for(payment: &Payment) -> Value {
    serde_json::to_value(PaymentDocument::from(payment.clone())).expect("serialise payment")
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[rstest]
#[actix_web::test]
async fn unpaginated_search_returns_only_data(payment: Payment) {
    let mut query = MockPaymentsQuery::new();
    let returned = payment.clone();
    query
        .expect_search()
        .withf(|request| request.pagination.is_none() && request.filter.ids().len() == 1)
        .times(1)
        .return_once(move |_| {
            Ok(PaymentSearchResponse {
                data: vec![returned],
                total: None,
            })
        });
    let app = actix_test::init_service(payments_app(mocked_state(query, MockPaymentsCommand::new()))).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/v1/payments?filter[id]={}", payment.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"], json!([body_for(&payment)]));
    assert!(body.get("meta").is_none());
    assert!(body.get("links").is_none());
}

#[rstest]
#[actix_web::test]
async fn paginated_search_reports_meta_and_links() {
    let world = fixture_world((0..3).map(|_| sample_payment()).collect());
    let app = actix_test::init_service(payments_app(world.state)).await;

    let req = actix_test::TestRequest::get()
        .uri("/v1/payments?page[number]=2&page[size]=2")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        body["meta"],
        json!({"number": 2, "size": 2, "total": 3, "pages": 2})
    );
    assert!(body["links"]["prev"].is_string());
    assert!(body["links"].get("next").is_none());
    assert_eq!(
        world.transactions.counts(),
        TransactionCounts {
            begun: 1,
            committed: 1,
            rolled_back: 0
        }
    );
}

#[rstest]
#[case::unknown_field("/v1/payments?filter[amount]=1", "invalid filter parameter")]
#[case::bad_key("/v1/payments?sort=id", "invalid query parameter")]
#[case::zero_size("/v1/payments?page[size]=0", "invalid paging parameter")]
#[case::signed_size("/v1/payments?page[size]=%2B5", "invalid paging parameter")]
#[case::page_beyond_range(
    "/v1/payments?page[number]=99999999999999999",
    "invalid paging parameter"
)]
#[actix_web::test]
async fn bad_search_parameters_are_rejected_before_the_service(
    #[case] uri: &str,
    #[case] title: &str,
) {
    let app = actix_test::init_service(payments_app(mocked_state(
        MockPaymentsQuery::new(),
        MockPaymentsCommand::new(),
    )))
    .await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(first_error(&body)["code"], json!("INVALID_ARGUMENT"));
    assert_eq!(first_error(&body)["title"], json!(title));
}

#[rstest]
#[actix_web::test]
async fn load_rejects_malformed_ids() {
    let app = actix_test::init_service(payments_app(mocked_state(
        MockPaymentsQuery::new(),
        MockPaymentsCommand::new(),
    )))
    .await;

    let req = actix_test::TestRequest::get().uri("/v1/payments/not-a-uuid").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(first_error(&body)["title"], json!("invalid format of ID"));
}

#[rstest]
#[actix_web::test]
async fn load_maps_not_found(payment: Payment) {
    let mut query = MockPaymentsQuery::new();
    query
        .expect_load()
        .times(1)
        .return_once(|_| Err(Error::not_found("unable to get payment", "no rows in result set")));
    let app = actix_test::init_service(payments_app(mocked_state(query, MockPaymentsCommand::new()))).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/v1/payments/{}", payment.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"errors": [{
            "status": "404",
            "code": "NOT_FOUND",
            "title": "unable to get payment",
            "detail": "no rows in result set"
        }]})
    );
}

#[rstest]
#[actix_web::test]
async fn storage_failures_are_redacted(payment: Payment) {
    let mut query = MockPaymentsQuery::new();
    query.expect_load().times(1).return_once(|_| {
        Err(Error::data_access(
            DataAccessCode::SelectFailed,
            "unable to get payment",
            "relation \"payment\" does not exist",
        ))
    });
    let app = actix_test::init_service(payments_app(mocked_state(query, MockPaymentsCommand::new()))).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/v1/payments/{}", payment.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"errors": [{"status": "500", "code": "INTERNAL"}]}));
}

#[rstest]
#[actix_web::test]
async fn create_then_load_round_trips(payment: Payment) {
    let world = fixture_world(Vec::new());
    let app = actix_test::init_service(payments_app(world.state)).await;

    let create = actix_test::TestRequest::post()
        .uri("/v1/payments")
        .set_json(body_for(&payment))
        .to_request();
    let created = actix_test::call_service(&app, create).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(created).await;
    assert_eq!(created["data"], body_for(&payment));

    let load = actix_test::TestRequest::get()
        .uri(&format!("/v1/payments/{}", payment.id))
        .to_request();
    let loaded = actix_test::call_service(&app, load).await;
    assert_eq!(loaded.status(), StatusCode::OK);
    let loaded: Value = actix_test::read_body_json(loaded).await;
    assert_eq!(loaded["data"], body_for(&payment));
}

#[rstest]
#[actix_web::test]
async fn duplicate_create_conflicts(payment: Payment) {
    let world = fixture_world(vec![payment.clone()]);
    let app = actix_test::init_service(payments_app(world.state)).await;

    let req = actix_test::TestRequest::post()
        .uri("/v1/payments")
        .set_json(body_for(&payment))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(world.transactions.counts().rolled_back, 1);
}

#[rstest]
#[actix_web::test]
async fn create_reports_unknown_currency(mut payment: Payment) {
    payment.amount.currency = "XXX".to_owned();
    let world = fixture_world(Vec::new());
    let app = actix_test::init_service(payments_app(world.state)).await;

    let req = actix_test::TestRequest::post()
        .uri("/v1/payments")
        .set_json(body_for(&payment))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(first_error(&body)["title"], json!("enum not found"));
    assert_eq!(first_error(&body)["detail"], json!("payment.amount.currency"));
}

#[rstest]
#[actix_web::test]
async fn create_without_id_is_invalid(payment: Payment) {
    let world = fixture_world(Vec::new());
    let app = actix_test::init_service(payments_app(world.state)).await;
    let mut body = body_for(&payment);
    if let Some(object) = body.as_object_mut() {
        object.remove("id");
    }

    let req = actix_test::TestRequest::post()
        .uri("/v1/payments")
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(first_error(&body)["detail"], json!("payment id must not be nil"));
    assert_eq!(world.transactions.counts(), TransactionCounts::default());
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_are_invalid_arguments() {
    let app = actix_test::init_service(payments_app(mocked_state(
        MockPaymentsQuery::new(),
        MockPaymentsCommand::new(),
    )))
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/v1/payments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"amount\":")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(first_error(&body)["code"], json!("INVALID_ARGUMENT"));
}

#[rstest]
#[actix_web::test]
async fn update_replaces_the_stored_payment(payment: Payment) {
    let world = fixture_world(vec![payment.clone()]);
    let app = actix_test::init_service(payments_app(world.state)).await;
    let mut changed = payment.clone();
    changed.scheme = "BACS".to_owned();
    let mut body = body_for(&changed);
    if let Some(object) = body.as_object_mut() {
        object.remove("id");
    }

    let req = actix_test::TestRequest::patch()
        .uri(&format!("/v1/payments/{}", payment.id))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"]["scheme"], json!("BACS"));
    assert_eq!(body["data"]["id"], json!(payment.id.to_string()));
}

#[rstest]
#[actix_web::test]
async fn update_of_unknown_payment_is_not_found(payment: Payment) {
    let world = fixture_world(Vec::new());
    let app = actix_test::init_service(payments_app(world.state)).await;

    let req = actix_test::TestRequest::patch()
        .uri(&format!("/v1/payments/{}", payment.id))
        .set_json(body_for(&payment))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(world.transactions.counts().rolled_back, 1);
}

#[rstest]
#[actix_web::test]
async fn delete_passes_the_id_and_returns_no_content(payment: Payment) {
    let mut command = MockPaymentsCommand::new();
    let expected = payment.id;
    command
        .expect_delete()
        .withf(move |id| *id == expected)
        .times(1)
        .return_once(|_| Ok(()));
    let app = actix_test::init_service(payments_app(mocked_state(MockPaymentsQuery::new(), command))).await;

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/v1/payments/{}", payment.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn deleting_an_unknown_payment_succeeds(payment: Payment) {
    let world = fixture_world(Vec::new());
    let app = actix_test::init_service(payments_app(world.state)).await;

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/v1/payments/{}", payment.id))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(world.transactions.counts().committed, 1);
}
