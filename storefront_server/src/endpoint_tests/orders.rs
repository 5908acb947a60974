use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use rsg_common::Vnd;
use storefront_engine::{
    db_types::{Order, OrderCode, OrderItem, OrderKey, OrderStatus, PaymentMethod, PaymentStatus},
    OrderApi,
};

use super::{
    helpers::{get_request, post_request},
    mocks::MockOrderManager,
};
use crate::routes::{CreateOrderRoute, OrderByKeyRoute, OrdersRoute, UpdateOrderStatusRoute};

#[actix_web::test]
async fn checkout_fills_in_the_default_delivery_fee() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({
        "customer_name": "Nguyễn Văn A",
        "customer_phone": "0901234567",
        "delivery_address": "123 Lê Lợi, Quận 1",
        "payment_method": "cash",
        "items": [ {"product_id": 1, "quantity": 2} ]
    });
    let (status, body) = post_request("/orders", body, configure_checkout).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let order: Order = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(order.order_code, OrderCode("ORD-001".into()));
    assert_eq!(order.total, Vnd::from(150_000));
}

fn configure_checkout(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_create_order()
        .withf(|o| o.delivery_fee == Some(Vnd::from(20_000)) && o.items.len() == 1)
        .returning(|_| Ok(sample_order()));
    cfg.service(CreateOrderRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

#[actix_web::test]
async fn order_code_in_the_path_resolves_to_a_code_key() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("/orders/ORD-001", configure_fetch_by_code).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_fetch_by_code(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order()
        .withf(|key| *key == OrderKey::ByCode(OrderCode("ORD-001".into())))
        .returning(|_| Ok(Some(sample_order())));
    cfg.service(OrderByKeyRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

#[actix_web::test]
async fn numeric_path_resolves_to_an_internal_id_key() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("/orders/42", configure_fetch_by_id).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_fetch_by_id(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order()
        .withf(|key| *key == OrderKey::ById(42))
        .returning(|_| Ok(Some(sample_order())));
    cfg.service(OrderByKeyRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

#[actix_web::test]
async fn unknown_status_labels_are_rejected_before_the_store() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "status": "teleported" });
    let (status, _) =
        post_request("/orders/ORD-001/status", body, configure_status_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure_status_untouched(cfg: &mut ServiceConfig) {
    let orders = MockOrderManager::new();
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

#[actix_web::test]
async fn status_updates_pass_the_parsed_label_through() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "status": "delivering" });
    let (status, _) = post_request("/orders/ORD-001/status", body, configure_status).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_status(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_update_order_status()
        .withf(|key, status| {
            *key == OrderKey::ByCode(OrderCode("ORD-001".into())) && *status == OrderStatus::Delivering
        })
        .returning(|_, _| {
            let mut order = sample_order();
            order.status = OrderStatus::Delivering;
            Ok(Some(order))
        });
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

#[actix_web::test]
async fn search_query_translates_into_a_filter_once() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("/orders?phone=0901234567&status=pending&page=2&limit=10", configure_search)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_search(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_search_orders()
        .withf(|filter| {
            filter.customer_phone.as_deref() == Some("0901234567") &&
                filter.status == Some(vec![OrderStatus::Pending]) &&
                filter.offset == Some(10) &&
                filter.limit == Some(10)
        })
        .returning(|_| Ok(vec![sample_order()]));
    cfg.service(OrdersRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(orders)));
}

pub fn sample_order() -> Order {
    let at = Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap();
    Order {
        id: 1,
        order_code: OrderCode("ORD-001".into()),
        customer_name: "Nguyễn Văn A".to_string(),
        customer_phone: "0901234567".to_string(),
        customer_email: None,
        delivery_address: "123 Lê Lợi, Quận 1".to_string(),
        items: vec![OrderItem {
            product_id: 1,
            product_name: "Phở bò".to_string(),
            product_price: Vnd::from(65_000),
            quantity: 2,
            special_instructions: None,
        }],
        subtotal: Vnd::from(130_000),
        delivery_fee: Vnd::from(20_000),
        total: Vnd::from(150_000),
        status: OrderStatus::Pending,
        payment_method: PaymentMethod::Cash,
        payment_status: PaymentStatus::Pending,
        provider_trans_id: None,
        special_instructions: None,
        estimated_delivery_time: None,
        created_at: at,
        updated_at: at,
    }
}
