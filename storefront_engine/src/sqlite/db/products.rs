//! Sqlite operations on the product table.

use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product},
    sfe_api::{ProductQueryFilter, ProductUpdate},
    traits::CatalogApiError,
};

const DEFAULT_PAGE_SIZE: i64 = 50;

pub async fn fetch_products(
    filter: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, CatalogApiError> {
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE 1 = 1");
    if let Some(category_id) = filter.category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(category_id);
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ");
        builder.push_bind(featured);
    }
    if !filter.include_unavailable {
        builder.push(" AND available = TRUE");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR name_en LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    builder.push(" ORDER BY featured DESC, created_at DESC");
    builder.push(" LIMIT ");
    builder.push_bind(filter.limit.unwrap_or(DEFAULT_PAGE_SIZE));
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset.unwrap_or(0));
    trace!("🛒️ Executing query: {}", builder.sql());
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, CatalogApiError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn insert_product(product: &NewProduct, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (name, name_en, description, image, category_id, price, featured, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(&product.name)
    .bind(&product.name_en)
    .bind(&product.description)
    .bind(&product.image)
    .bind(product.category_id)
    .bind(product.price)
    .bind(product.featured)
    .bind(product.available)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn update_product(
    id: i64,
    update: &ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, CatalogApiError> {
    if update.is_empty() {
        return Err(CatalogApiError::ModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = &update.new_name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(name_en) = &update.new_name_en {
        set_clause.push("name_en = ");
        set_clause.push_bind_unseparated(name_en);
    }
    if let Some(description) = &update.new_description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(image) = &update.new_image {
        set_clause.push("image = ");
        set_clause.push_bind_unseparated(image);
    }
    if let Some(category_id) = update.new_category_id {
        set_clause.push("category_id = ");
        set_clause.push_bind_unseparated(category_id);
    }
    if let Some(price) = update.new_price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(featured) = update.new_featured {
        set_clause.push("featured = ");
        set_clause.push_bind_unseparated(featured);
    }
    if let Some(available) = update.new_available {
        set_clause.push("available = ");
        set_clause.push_bind_unseparated(available);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🛒️ Executing query: {}", builder.sql());
    let product = builder.build_query_as::<Product>().fetch_optional(conn).await?;
    Ok(product)
}

pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<bool, CatalogApiError> {
    let res = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    Ok(res.rows_affected() == 1)
}
