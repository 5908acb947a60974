//! Sqlite operations on the order and order-item tables.

use chrono::{DateTime, Utc};
use log::trace;
use rsg_common::Vnd;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderCode, OrderItem, OrderKey, OrderStatus},
    sfe_api::{OrderQueryFilter, OrderUpdate},
    traits::OrderApiError,
};

const DEFAULT_PAGE_SIZE: i64 = 50;

/// The next human-readable order code, `ORD-001`, `ORD-002`, … Derived from the monotonic rowid;
/// a row count would repeat codes once an order has been deleted.
pub async fn next_order_code(conn: &mut SqliteConnection) -> Result<OrderCode, OrderApiError> {
    let max_id: (i64,) = sqlx::query_as("SELECT COALESCE(MAX(id), 0) FROM orders").fetch_one(conn).await?;
    Ok(OrderCode(format!("ORD-{:03}", max_id.0 + 1)))
}

/// Insert the order row and its line-item snapshots. Totals are computed by the caller; this is
/// not atomic on its own and is expected to run inside a transaction.
pub async fn insert_order(
    code: &OrderCode,
    order: &NewOrder,
    items: &[OrderItem],
    subtotal: Vnd,
    delivery_fee: Vnd,
    estimated_delivery_time: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderApiError> {
    let total = subtotal + delivery_fee;
    let mut inserted: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_code,
                customer_name,
                customer_phone,
                customer_email,
                delivery_address,
                subtotal,
                delivery_fee,
                total,
                payment_method,
                special_instructions,
                estimated_delivery_time
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(code)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_email)
    .bind(&order.delivery_address)
    .bind(subtotal)
    .bind(delivery_fee)
    .bind(total)
    .bind(order.payment_method)
    .bind(&order.special_instructions)
    .bind(estimated_delivery_time)
    .fetch_one(&mut *conn)
    .await?;
    for item in items {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, product_name, product_price, quantity,
                    special_instructions)
                VALUES ($1, $2, $3, $4, $5, $6);
            "#,
        )
        .bind(inserted.id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.product_price)
        .bind(item.quantity)
        .bind(&item.special_instructions)
        .execute(&mut *conn)
        .await?;
    }
    inserted.items = items.to_vec();
    Ok(inserted)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT product_id, product_name, product_price, quantity, special_instructions FROM order_items WHERE \
         order_id = $1 ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await
}

/// Fetch an order through the tagged key, with its line items.
pub async fn fetch_order_by_key(key: &OrderKey, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = match key {
        OrderKey::ById(id) => {
            sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?
        },
        OrderKey::ByCode(code) => {
            sqlx::query_as("SELECT * FROM orders WHERE order_code = $1")
                .bind(code.as_str())
                .fetch_optional(&mut *conn)
                .await?
        },
    };
    hydrate(order, conn).await
}

async fn hydrate(order: Option<Order>, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    match order {
        Some(mut order) => {
            order.items = fetch_order_items(order.id, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`.
///
/// Resulting orders are ordered by `created_at` in descending order (newest first).
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders WHERE 1 = 1");
    if let Some(code) = &query.order_code {
        builder.push(" AND order_code = ");
        builder.push_bind(code.to_string());
    }
    if let Some(phone) = &query.customer_phone {
        builder.push(" AND customer_phone = ");
        builder.push_bind(phone.clone());
    }
    if query.status.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let statuses =
            query.status.as_ref().unwrap().iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(",");
        builder.push(format!(" AND status IN ({statuses})"));
    }
    if let Some(payment_status) = query.payment_status {
        builder.push(" AND payment_status = ");
        builder.push_bind(payment_status.to_string());
    }
    if let Some(since) = query.since {
        builder.push(" AND created_at >= ");
        builder.push_bind(since);
    }
    if let Some(until) = query.until {
        builder.push(" AND created_at <= ");
        builder.push_bind(until);
    }
    builder.push(" ORDER BY created_at DESC");
    builder.push(" LIMIT ");
    builder.push_bind(query.limit.unwrap_or(DEFAULT_PAGE_SIZE));
    builder.push(" OFFSET ");
    builder.push_bind(query.offset.unwrap_or(0));
    trace!("📝️ Executing query: {}", builder.sql());
    let mut orders = builder.build_query_as::<Order>().fetch_all(&mut *conn).await?;
    for order in &mut orders {
        order.items = fetch_order_items(order.id, &mut *conn).await?;
    }
    Ok(orders)
}

pub async fn update_order(
    key: &OrderKey,
    update: &OrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderApiError> {
    if update.is_empty() {
        return Err(OrderApiError::ModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = &update.new_customer_name {
        set_clause.push("customer_name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(phone) = &update.new_customer_phone {
        set_clause.push("customer_phone = ");
        set_clause.push_bind_unseparated(phone);
    }
    if let Some(email) = &update.new_customer_email {
        set_clause.push("customer_email = ");
        set_clause.push_bind_unseparated(email);
    }
    if let Some(address) = &update.new_delivery_address {
        set_clause.push("delivery_address = ");
        set_clause.push_bind_unseparated(address);
    }
    if let Some(status) = update.new_status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(payment_status) = update.new_payment_status {
        set_clause.push("payment_status = ");
        set_clause.push_bind_unseparated(payment_status.to_string());
    }
    if let Some(instructions) = &update.new_special_instructions {
        set_clause.push("special_instructions = ");
        set_clause.push_bind_unseparated(instructions);
    }
    if let Some(eta) = update.new_estimated_delivery_time {
        set_clause.push("estimated_delivery_time = ");
        set_clause.push_bind_unseparated(eta);
    }
    match key {
        OrderKey::ById(id) => {
            builder.push(" WHERE id = ");
            builder.push_bind(*id);
        },
        OrderKey::ByCode(code) => {
            builder.push(" WHERE order_code = ");
            builder.push_bind(code.to_string());
        },
    }
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let order = builder.build_query_as::<Order>().fetch_optional(&mut *conn).await?;
    Ok(hydrate(order, conn).await?)
}

pub async fn update_order_status(
    key: &OrderKey,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderApiError> {
    let update = OrderUpdate::default().with_status(status);
    update_order(key, &update, conn).await
}

pub async fn delete_order(key: &OrderKey, conn: &mut SqliteConnection) -> Result<Option<Order>, OrderApiError> {
    // Fetch first so the returned record still carries its items.
    let order = fetch_order_by_key(key, &mut *conn).await?;
    if let Some(order) = &order {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1").bind(order.id).execute(&mut *conn).await?;
        sqlx::query("DELETE FROM orders WHERE id = $1").bind(order.id).execute(conn).await?;
    }
    Ok(order)
}

/// Store the provider transaction id on the order and mark it as a pending provider payment.
pub async fn attach_provider_transaction(
    key: &OrderKey,
    trans_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        "UPDATE orders SET provider_trans_id = ",
    );
    builder.push_bind(trans_id);
    builder.push(", payment_method = 'zalopay', payment_status = 'pending', updated_at = CURRENT_TIMESTAMP");
    match key {
        OrderKey::ById(id) => {
            builder.push(" WHERE id = ");
            builder.push_bind(*id);
        },
        OrderKey::ByCode(code) => {
            builder.push(" WHERE order_code = ");
            builder.push_bind(code.to_string());
        },
    }
    builder.push(" RETURNING *");
    let order = builder.build_query_as::<Order>().fetch_optional(&mut *conn).await?;
    hydrate(order, conn).await
}

/// Apply a verified callback result to the order carrying this transaction id.
pub async fn apply_callback_result(
    trans_id: &str,
    paid: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let sql = if paid {
        "UPDATE orders SET payment_status = 'paid', status = 'completed', updated_at = CURRENT_TIMESTAMP WHERE \
         provider_trans_id = $1 RETURNING *"
    } else {
        "UPDATE orders SET payment_status = 'failed', updated_at = CURRENT_TIMESTAMP WHERE provider_trans_id = $1 \
         RETURNING *"
    };
    let order = sqlx::query_as(sql).bind(trans_id).fetch_optional(&mut *conn).await?;
    hydrate(order, conn).await
}

/// Apply a status-poll result. An unpaid poll resets the payment status to `pending` rather than
/// failing the order; the provider may still complete the payment.
pub async fn apply_poll_result(
    id: i64,
    paid: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let sql = if paid {
        "UPDATE orders SET payment_status = 'paid', status = 'completed', updated_at = CURRENT_TIMESTAMP WHERE id = \
         $1 RETURNING *"
    } else {
        "UPDATE orders SET payment_status = 'pending', updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *"
    };
    let order = sqlx::query_as(sql).bind(id).fetch_optional(&mut *conn).await?;
    hydrate(order, conn).await
}
