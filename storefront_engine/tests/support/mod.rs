//! Shared scaffolding for the engine integration tests. Each test runs against its own in-memory
//! SQLite database with the migrations applied.
#![allow(dead_code)]

use rsg_common::Vnd;
use storefront_engine::{
    db_types::{Category, NewCategory, NewOrder, NewOrderItem, NewProduct, Order, PaymentMethod, Product},
    traits::{CatalogManagement, OrderManagement},
    SqliteDatabase,
};

pub async fn new_db() -> SqliteDatabase {
    let _ = env_logger::try_init().ok();
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("in-memory database opens")
}

pub fn new_category(name: &str, sort_order: Option<i64>) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        name_en: name.to_string(),
        description: format!("{name} dishes"),
        image: format!("/images/{name}.jpg"),
        sort_order,
    }
}

/// Create one category per name, in order, letting the engine append each at `max + 1`.
pub async fn seed_categories(db: &SqliteDatabase, names: &[&str]) -> Vec<Category> {
    let mut created = Vec::with_capacity(names.len());
    for name in names {
        created.push(db.create_category(new_category(name, None)).await.expect("category created"));
    }
    created
}

pub async fn seed_product(db: &SqliteDatabase, category_id: i64, name: &str, price: i64) -> Product {
    db.create_product(NewProduct {
        name: name.to_string(),
        name_en: name.to_string(),
        description: format!("{name} description"),
        image: format!("/images/{name}.jpg"),
        category_id,
        price: Vnd::from(price),
        featured: false,
        available: true,
    })
    .await
    .expect("product created")
}

pub fn checkout_request(items: Vec<NewOrderItem>) -> NewOrder {
    NewOrder {
        customer_name: "Nguyễn Văn A".to_string(),
        customer_phone: "0901234567".to_string(),
        customer_email: None,
        delivery_address: "123 Lê Lợi, Quận 1".to_string(),
        items,
        payment_method: PaymentMethod::Cash,
        delivery_fee: Some(Vnd::from(20_000)),
        special_instructions: None,
    }
}

pub fn item(product_id: i64, quantity: i64) -> NewOrderItem {
    NewOrderItem { product_id, quantity, special_instructions: None }
}

/// Place an order for `quantity` of a freshly seeded product and return it.
pub async fn seed_order(db: &SqliteDatabase, price: i64, quantity: i64) -> Order {
    let category = db.create_category(new_category("Phở", None)).await.expect("category created");
    let product = seed_product(db, category.id, "Phở bò", price).await;
    db.create_order(checkout_request(vec![item(product.id, quantity)])).await.expect("order created")
}

/// The two ordinal invariants: no two categories share a position, and positions are exactly
/// `1..=N`.
pub async fn assert_unique_dense(db: &SqliteDatabase) {
    let categories = db.fetch_categories().await.expect("categories fetched");
    let mut orders = categories.iter().map(|c| c.sort_order).collect::<Vec<_>>();
    orders.sort_unstable();
    orders.dedup();
    assert_eq!(orders.len(), categories.len(), "positions must be unique");
    assert_eq!(orders, (1..=categories.len() as i64).collect::<Vec<_>>(), "positions must be dense");
}
