use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use storefront_engine::{db_types::Category, CatalogApi};

use super::{
    helpers::{delete_request, get_request, patch_request, post_request},
    mocks::MockCatalogManager,
};
use crate::routes::{
    CategoriesRoute,
    CreateCategoryRoute,
    DeleteCategoryRoute,
    FixCategoryOrdersRoute,
    ReorderCategoriesRoute,
    UpdateCategoryRoute,
};

#[actix_web::test]
async fn fetch_categories_sorted() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/categories", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let categories: Vec<Category> = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(categories.len(), 3);
    assert!(categories.windows(2).all(|w| w[0].sort_order < w[1].sort_order));
    // The position serialises under its wire name
    assert!(body.contains(r#""order":1"#));
    assert!(!body.contains("sort_order"));
}

fn configure_list(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_categories().returning(|| Ok(sample_categories()));
    cfg.service(CategoriesRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn create_category_with_requested_position() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({
        "name": "Món nướng",
        "name_en": "Grilled",
        "description": "Than hoa",
        "image": "/images/grilled.jpg",
        "order": 2
    });
    let (status, body) = post_request("/categories", body, configure_create).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let category: Category = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(category.sort_order, 2);
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_create_category()
        .withf(|c| c.name == "Món nướng" && c.sort_order == Some(2))
        .returning(|c| {
            let mut created = sample_categories().remove(1);
            created.name = c.name;
            created.sort_order = 2;
            Ok(created)
        });
    cfg.service(CreateCategoryRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn create_category_missing_required_field_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "name": "Món nướng" });
    // The mock has no expectations: reaching the store would fail the test.
    let (status, _) = post_request("/categories", body, configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_with_unknown_field_is_rejected_before_the_store() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "new_name": "Lẩu", "surprise": true });
    let (status, _) = patch_request("/categories/7", body, configure_untouched).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure_untouched(cfg: &mut ServiceConfig) {
    let catalog = MockCatalogManager::new();
    cfg.service(CreateCategoryRoute::<MockCatalogManager>::new())
        .service(UpdateCategoryRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn reassign_position_via_update() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "new_order": 3 });
    let (status, body) = patch_request("/categories/1", body, configure_reassign).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let category: Category = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(category.sort_order, 3);
}

fn configure_reassign(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_update_category()
        .withf(|id, update| *id == 1 && update.new_order == Some(3) && !update.has_field_changes())
        .returning(|_, _| {
            let mut moved = sample_categories().remove(0);
            moved.sort_order = 3;
            Ok(Some(moved))
        });
    cfg.service(UpdateCategoryRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn bulk_reorder_passes_the_entries_through() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({
        "categories": [ {"id": 1, "order": 3}, {"id": 3, "order": 1} ]
    });
    let (status, body) = post_request("/categories/reorder", body, configure_reorder).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Category order updated successfully"));
}

fn configure_reorder(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_reorder_categories()
        .withf(|entries| {
            entries.len() == 2 &&
                entries[0].id == 1 &&
                entries[0].sort_order == 3 &&
                entries[1].id == 3 &&
                entries[1].sort_order == 1
        })
        .returning(|entries| Ok(entries.len() * 3));
    cfg.service(ReorderCategoriesRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn delete_missing_category_is_not_found() {
    let _ = env_logger::try_init().ok();
    let (status, body) = delete_request("/categories/99", configure_delete_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Category 99"));
}

fn configure_delete_missing(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_delete_category().withf(|id| *id == 99).returning(|_| Ok(None));
    cfg.service(DeleteCategoryRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

#[actix_web::test]
async fn repair_reports_the_renumber_count() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request("/admin/fix_category_orders", serde_json::json!({}), configure_repair).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("12 categories renumbered"));
}

fn configure_repair(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_renumber_categories().returning(|| Ok(12));
    cfg.service(FixCategoryOrdersRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

fn sample_categories() -> Vec<Category> {
    let at = Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap();
    let base = Category {
        id: 0,
        name: String::new(),
        name_en: String::new(),
        description: "Đặc sản".to_string(),
        image: "/images/placeholder.jpg".to_string(),
        sort_order: 0,
        created_at: at,
        updated_at: at,
    };
    vec![
        Category { id: 1, name: "Phở".into(), name_en: "Pho".into(), sort_order: 1, ..base.clone() },
        Category { id: 2, name: "Bún".into(), name_en: "Noodles".into(), sort_order: 2, ..base.clone() },
        Category { id: 3, name: "Đồ uống".into(), name_en: "Drinks".into(), sort_order: 3, ..base },
    ]
}
