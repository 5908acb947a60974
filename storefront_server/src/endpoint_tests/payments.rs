use actix_web::{http::StatusCode, web, web::ServiceConfig};
use rsg_common::Vnd;
use storefront_engine::{
    db_types::{CallbackOutcome, OrderCode, OrderKey},
    OrderApi,
    PaymentFlowApi,
};
use zalopay_tools::helpers::hmac_sha256_hex;

use super::{
    helpers::{post_form_request, post_request, post_request_with_proto},
    mocks::{MockOrderManager, MockPaymentManager},
    orders::sample_order,
};
use crate::payment_routes::{CreatePaymentRoute, PaymentCallbackRoute, PaymentStatusRoute};

const TEST_CALLBACK_KEY: &str = "test-key2";

/// The payment configuration is read from the environment at call time, so the tests plant a
/// fixed one. Values are identical across tests; setting them concurrently is harmless.
fn set_payment_env() {
    std::env::set_var("PAY_APP_ID", "2554");
    std::env::set_var("PAY_MAC_KEY", "test-key1");
    std::env::set_var("PAY_CALLBACK_KEY", TEST_CALLBACK_KEY);
    std::env::set_var("PAY_PROVIDER_BASE_URL", "https://sb-openapi.zalopay.vn");
    std::env::set_var("APP_BASE_URL", "https://shop.example.com");
}

//----------------------------------------------   Callback  ----------------------------------------------------

#[actix_web::test]
async fn callback_with_a_bad_mac_mutates_nothing() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let body = serde_json::json!({
        "data": r#"{"app_trans_id":"251225_001abc","return_code":1}"#,
        "mac": "00000000000000000000000000000000000000000000000000000000000000ff",
    });
    // The mock carries no expectations: any call into the reconciliation path fails the test.
    let (status, body) = post_request("/payments/callback", body, configure_callback_untouched)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""return_code":0"#));
    assert!(body.contains("invalid signature"));
}

#[actix_web::test]
async fn callback_without_data_or_mac_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let (status, _) = post_request("/payments/callback", serde_json::json!({"data": "x"}), configure_callback_untouched)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure_callback_untouched(cfg: &mut ServiceConfig) {
    let payments = MockPaymentManager::new();
    cfg.service(PaymentCallbackRoute::<MockPaymentManager>::new())
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

#[actix_web::test]
async fn first_valid_callback_is_applied() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let data = r#"{"app_trans_id":"251225_001abc","return_code":1,"amount":150000}"#;
    let mac = hmac_sha256_hex(TEST_CALLBACK_KEY, data);
    let body = serde_json::json!({ "data": data, "mac": mac });
    let (status, body) = post_request("/payments/callback", body, configure_callback_applied)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""return_code":1"#));
    assert!(body.contains("success"));
}

fn configure_callback_applied(cfg: &mut ServiceConfig) {
    let mut payments = MockPaymentManager::new();
    payments
        .expect_record_callback()
        .withf(|trans_id, paid| trans_id == "251225_001abc" && *paid)
        .times(1)
        .returning(|_, _| Ok(CallbackOutcome::Applied(sample_order())));
    cfg.service(PaymentCallbackRoute::<MockPaymentManager>::new())
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

#[actix_web::test]
async fn replayed_callback_still_acknowledges_the_provider() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let data = r#"{"app_trans_id":"251225_001abc","return_code":1}"#;
    let mac = hmac_sha256_hex(TEST_CALLBACK_KEY, data);
    let body = serde_json::json!({ "data": data, "mac": mac });
    let (status, body) =
        post_request("/payments/callback", body, configure_callback_replay).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""return_code":1"#));
    assert!(body.contains("ok"));
}

fn configure_callback_replay(cfg: &mut ServiceConfig) {
    let mut payments = MockPaymentManager::new();
    payments.expect_record_callback().times(1).returning(|_, _| Ok(CallbackOutcome::Replay));
    cfg.service(PaymentCallbackRoute::<MockPaymentManager>::new())
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

#[actix_web::test]
async fn form_encoded_callbacks_are_accepted() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let data = r#"{"app_trans_id":"251225_001abc","return_code":1}"#;
    let mac = hmac_sha256_hex(TEST_CALLBACK_KEY, data);
    let form = serde_urlencoded::to_string([("data", data), ("mac", mac.as_str())]).expect("encodes");
    let (status, body) =
        post_form_request("/payments/callback", form, configure_callback_replay).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""return_code":1"#));
}

#[actix_web::test]
async fn callback_with_a_failed_return_code_marks_the_payment_failed() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let data = r#"{"app_trans_id":"251225_001abc","return_code":2}"#;
    let mac = hmac_sha256_hex(TEST_CALLBACK_KEY, data);
    let body = serde_json::json!({ "data": data, "mac": mac });
    let (status, _) = post_request("/payments/callback", body, configure_callback_failed).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_callback_failed(cfg: &mut ServiceConfig) {
    let mut payments = MockPaymentManager::new();
    payments
        .expect_record_callback()
        .withf(|trans_id, paid| trans_id == "251225_001abc" && !*paid)
        .times(1)
        .returning(|_, _| Ok(CallbackOutcome::Applied(sample_order())));
    cfg.service(PaymentCallbackRoute::<MockPaymentManager>::new())
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

//----------------------------------------------    Create   ----------------------------------------------------

#[actix_web::test]
async fn create_payment_for_a_missing_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let body = serde_json::json!({ "order_id": "ORD-404" });
    let (status, _) = post_request("/payments/create", body, configure_create_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_create_missing(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order()
        .withf(|key| *key == OrderKey::ByCode(OrderCode("ORD-404".into())))
        .returning(|_| Ok(None));
    let payments = MockPaymentManager::new();
    cfg.service(CreatePaymentRoute::<MockOrderManager, MockPaymentManager>::new())
        .app_data(web::Data::new(OrderApi::new(orders)))
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

#[actix_web::test]
async fn create_payment_refuses_a_non_positive_total() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let body = serde_json::json!({ "order_id": "ORD-001" });
    let (status, body) = post_request("/payments/create", body, configure_create_zero_total)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid order total"));
}

fn configure_create_zero_total(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().returning(|_| {
        let mut order = sample_order();
        order.total = Vnd::from(0);
        Ok(Some(order))
    });
    let payments = MockPaymentManager::new();
    cfg.service(CreatePaymentRoute::<MockOrderManager, MockPaymentManager>::new())
        .app_data(web::Data::new(OrderApi::new(orders)))
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

#[actix_web::test]
async fn explicit_plaintext_requests_fail_before_any_lookup() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let body = serde_json::json!({ "order_id": "ORD-001" });
    // Mocks carry no expectations: the request must be refused before the store or provider.
    let (status, body) = post_request_with_proto("/payments/create", body, "http", configure_create_untouched)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("HTTPS is required"));
}

fn configure_create_untouched(cfg: &mut ServiceConfig) {
    let orders = MockOrderManager::new();
    let payments = MockPaymentManager::new();
    cfg.service(CreatePaymentRoute::<MockOrderManager, MockPaymentManager>::new())
        .app_data(web::Data::new(OrderApi::new(orders)))
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}

//----------------------------------------------    Status   ----------------------------------------------------

#[actix_web::test]
async fn polling_an_order_without_a_transaction_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    set_payment_env();
    let body = serde_json::json!({ "order_id": "ORD-001" });
    let (status, body) = post_request("/payments/status", body, configure_status_no_transaction)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no provider transaction"));
}

fn configure_status_no_transaction(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().returning(|_| Ok(Some(sample_order())));
    let payments = MockPaymentManager::new();
    cfg.service(PaymentStatusRoute::<MockOrderManager, MockPaymentManager>::new())
        .app_data(web::Data::new(OrderApi::new(orders)))
        .app_data(web::Data::new(PaymentFlowApi::new(payments)));
}
