//! Sqlite operations on the category table and its ordinal sequence.
//!
//! The `sort_order` column carries a UNIQUE index. Multi-row shifts are therefore staged through
//! values strictly above anything in real use (`STAGING_OFFSET`), so that a single shift statement
//! can never collide with a row that has not moved yet. Clients should prefer the
//! [`CatalogManagement`](crate::traits::CatalogManagement) trait methods on
//! [`SqliteDatabase`](crate::SqliteDatabase), which wrap these calls in transactions.

use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Category, NewCategory},
    sfe_api::CategoryUpdate,
    traits::CatalogApiError,
};

/// Offset used to stage multi-row shifts out of the occupied range. Real positions stay far below
/// this value; the renumbering repair tool restores `1..N` if a crashed request ever leaves staged
/// values behind.
const STAGING_OFFSET: i64 = 1 << 30;

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, CatalogApiError> {
    let categories =
        sqlx::query_as("SELECT * FROM categories ORDER BY sort_order ASC").fetch_all(conn).await?;
    Ok(categories)
}

pub async fn fetch_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, CatalogApiError> {
    let category = sqlx::query_as("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(category)
}

/// The highest position currently in use, or 0 when the table is empty.
pub async fn max_sort_order(conn: &mut SqliteConnection) -> Result<i64, CatalogApiError> {
    let max: (i64,) =
        sqlx::query_as("SELECT COALESCE(MAX(sort_order), 0) FROM categories").fetch_one(conn).await?;
    Ok(max.0)
}

/// The id of the category currently holding the given position, if any.
pub async fn holder_of(sort_order: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, CatalogApiError> {
    let holder: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE sort_order = $1")
        .bind(sort_order)
        .fetch_optional(conn)
        .await?;
    Ok(holder.map(|h| h.0))
}

pub async fn insert_category(
    category: &NewCategory,
    sort_order: i64,
    conn: &mut SqliteConnection,
) -> Result<Category, CatalogApiError> {
    let category = sqlx::query_as(
        r#"
            INSERT INTO categories (name, name_en, description, image, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(&category.name)
    .bind(&category.name_en)
    .bind(&category.description)
    .bind(&category.image)
    .bind(sort_order)
    .fetch_one(conn)
    .await?;
    Ok(category)
}

pub async fn set_sort_order(id: i64, sort_order: i64, conn: &mut SqliteConnection) -> Result<(), CatalogApiError> {
    sqlx::query("UPDATE categories SET sort_order = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(sort_order)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Shift every position at or above `from` by `delta`, staging through the offset range so the
/// UNIQUE index never sees two rows on the same value mid-statement. Returns the number of rows
/// moved.
pub async fn shift_orders_from(from: i64, delta: i64, conn: &mut SqliteConnection) -> Result<u64, CatalogApiError> {
    sqlx::query("UPDATE categories SET sort_order = sort_order + $1 WHERE sort_order >= $2")
        .bind(STAGING_OFFSET)
        .bind(from)
        .execute(&mut *conn)
        .await?;
    let moved = sqlx::query(
        "UPDATE categories SET sort_order = sort_order - $1, updated_at = CURRENT_TIMESTAMP WHERE sort_order >= $2",
    )
    .bind(STAGING_OFFSET - delta)
    .bind(STAGING_OFFSET)
    .execute(conn)
    .await?;
    Ok(moved.rows_affected())
}

/// Apply the non-positional fields of an update. The position is handled separately by the caller.
pub async fn update_fields(
    id: i64,
    update: &CategoryUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Category>, CatalogApiError> {
    if !update.has_field_changes() {
        return fetch_category(id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE categories SET updated_at = CURRENT_TIMESTAMP, ");
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
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗂️ Executing query: {}", builder.sql());
    let category = builder.build_query_as::<Category>().fetch_optional(conn).await?;
    Ok(category)
}

/// `(id, sort_order)` for every category. Used to seed the in-memory maps of a bulk reorder.
pub async fn id_order_pairs(conn: &mut SqliteConnection) -> Result<Vec<(i64, i64)>, CatalogApiError> {
    let pairs = sqlx::query_as("SELECT id, sort_order FROM categories").fetch_all(conn).await?;
    Ok(pairs)
}

/// Category ids sorted by creation time, oldest first. The renumbering repair tool assigns `1..N`
/// in this sequence.
pub async fn ids_by_creation(conn: &mut SqliteConnection) -> Result<Vec<i64>, CatalogApiError> {
    let ids: Vec<(i64,)> =
        sqlx::query_as("SELECT id FROM categories ORDER BY created_at ASC, id ASC").fetch_all(conn).await?;
    Ok(ids.into_iter().map(|row| row.0).collect())
}

/// Move every position into the staging range in one statement. Used by the renumbering repair
/// tool so the subsequent `1..N` assignment cannot collide with a value still in place.
pub async fn stage_all_orders(conn: &mut SqliteConnection) -> Result<(), CatalogApiError> {
    sqlx::query("UPDATE categories SET sort_order = sort_order + $1 WHERE sort_order < $1")
        .bind(STAGING_OFFSET)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, CatalogApiError> {
    let deleted =
        sqlx::query_as("DELETE FROM categories WHERE id = $1 RETURNING *").bind(id).fetch_optional(conn).await?;
    Ok(deleted)
}
