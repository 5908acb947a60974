//! `SqliteDatabase` is a concrete implementation of a storefront gateway backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`traits`](crate::traits) module. The pool is opened once at process start and the handle is
//! cloned into request handlers; it is never recreated mid-process.
use std::{collections::HashMap, fmt::Debug};

use chrono::{Duration, Utc};
use log::*;
use rsg_common::Vnd;
use sqlx::SqlitePool;

use super::db::{categories, new_pool, nonces, orders, products};
use crate::{
    db_types::{
        CallbackOutcome,
        Category,
        NewCategory,
        NewOrder,
        NewProduct,
        Order,
        OrderItem,
        OrderKey,
        OrderStatus,
        Product,
    },
    sfe_api::{CategoryUpdate, OrderQueryFilter, OrderUpdate, ProductQueryFilter, ProductUpdate, ReorderEntry},
    traits::{
        CatalogApiError,
        CatalogManagement,
        OrderApiError,
        OrderManagement,
        PaymentReconciliation,
        ReconciliationApiError,
    },
};

/// Gap between the current maximum position and the first temporary slot used to park a displaced
/// category during a swap.
const TEMP_SLOT_GAP: i64 = 1000;

/// Orders are estimated to arrive 45 minutes after checkout.
const ESTIMATED_DELIVERY_MINUTES: i64 = 45;

const CALLBACK_NONCE_PURPOSE: &str = "payment_callback";

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Open a pool against the given URL and bring the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        categories::fetch_categories(&mut conn).await
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        categories::fetch_category(id, &mut conn).await
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let sort_order = match category.sort_order {
            None => categories::max_sort_order(&mut tx).await? + 1,
            Some(requested) => {
                if categories::holder_of(requested, &mut tx).await?.is_some() {
                    let moved = categories::shift_orders_from(requested, 1, &mut tx).await?;
                    debug!("🗂️ Position {requested} was taken. {moved} categories shifted up to make room.");
                }
                requested
            },
        };
        let category = categories::insert_category(&category, sort_order, &mut tx).await?;
        tx.commit().await?;
        debug!("🗂️ Category [{}] created at position {}", category.name, category.sort_order);
        Ok(category)
    }

    async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError> {
        if update.is_empty() {
            return Err(CatalogApiError::ModificationNoOp);
        }
        let mut tx = self.pool.begin().await?;
        let current = match categories::fetch_category(id, &mut tx).await? {
            Some(c) => c,
            None => return Ok(None),
        };
        if let Some(new_order) = update.new_order {
            if new_order != current.sort_order {
                match categories::holder_of(new_order, &mut tx).await? {
                    // Swap: park the holder above the range in use, take its position, then hand
                    // it the one we vacated.
                    Some(holder_id) if holder_id != id => {
                        let temp = categories::max_sort_order(&mut tx).await? + TEMP_SLOT_GAP;
                        categories::set_sort_order(holder_id, temp, &mut tx).await?;
                        categories::set_sort_order(id, new_order, &mut tx).await?;
                        categories::set_sort_order(holder_id, current.sort_order, &mut tx).await?;
                        debug!(
                            "🗂️ Category #{id} moved to position {new_order}; #{holder_id} took position {}",
                            current.sort_order
                        );
                    },
                    _ => categories::set_sort_order(id, new_order, &mut tx).await?,
                }
            }
        }
        let category = categories::update_fields(id, &update, &mut tx).await?;
        tx.commit().await?;
        Ok(category)
    }

    async fn reorder_categories(&self, entries: &[ReorderEntry]) -> Result<usize, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let existing = categories::id_order_pairs(&mut tx).await?;
        let mut id_to_order: HashMap<i64, i64> = HashMap::with_capacity(existing.len());
        let mut order_to_id: HashMap<i64, i64> = HashMap::with_capacity(existing.len());
        let mut max_order = 0;
        for (id, sort_order) in existing {
            id_to_order.insert(id, sort_order);
            order_to_id.insert(sort_order, id);
            max_order = max_order.max(sort_order);
        }
        let mut temp_slot = max_order + TEMP_SLOT_GAP;
        let mut writes = 0usize;
        for entry in entries {
            let desired = entry.sort_order;
            let current = match id_to_order.get(&entry.id) {
                Some(current) => *current,
                None => {
                    warn!("🗂️ Reorder entry refers to unknown category #{}; skipping.", entry.id);
                    continue;
                },
            };
            if current == desired {
                continue;
            }
            match order_to_id.get(&desired).copied() {
                Some(holder_id) if holder_id != entry.id => {
                    // Same displacement as a single reassignment, chained through the maps so a
                    // later entry sees where the holder actually ended up.
                    categories::set_sort_order(holder_id, temp_slot, &mut tx).await?;
                    categories::set_sort_order(entry.id, desired, &mut tx).await?;
                    categories::set_sort_order(holder_id, current, &mut tx).await?;
                    order_to_id.remove(&current);
                    order_to_id.insert(desired, entry.id);
                    order_to_id.insert(current, holder_id);
                    id_to_order.insert(entry.id, desired);
                    id_to_order.insert(holder_id, current);
                    temp_slot += 1;
                    writes += 3;
                },
                _ => {
                    categories::set_sort_order(entry.id, desired, &mut tx).await?;
                    order_to_id.remove(&current);
                    order_to_id.insert(desired, entry.id);
                    id_to_order.insert(entry.id, desired);
                    writes += 1;
                },
            }
        }
        tx.commit().await?;
        debug!("🗂️ Bulk reorder complete. {writes} writes for {} entries.", entries.len());
        Ok(writes)
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = categories::delete_category(id, &mut tx).await?;
        if let Some(deleted) = &deleted {
            let moved = categories::shift_orders_from(deleted.sort_order + 1, -1, &mut tx).await?;
            debug!(
                "🗂️ Category [{}] deleted from position {}. {moved} categories shifted down.",
                deleted.name, deleted.sort_order
            );
        }
        tx.commit().await?;
        Ok(deleted)
    }

    async fn renumber_categories(&self) -> Result<usize, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let ids = categories::ids_by_creation(&mut tx).await?;
        categories::stage_all_orders(&mut tx).await?;
        for (i, id) in ids.iter().enumerate() {
            categories::set_sort_order(*id, i as i64 + 1, &mut tx).await?;
        }
        tx.commit().await?;
        info!("🗂️ Renumbered {} categories sequentially by creation time.", ids.len());
        Ok(ids.len())
    }

    async fn fetch_products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products(filter, &mut conn).await
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(&product, &mut conn).await
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(id, &update, &mut conn).await
    }

    async fn delete_product(&self, id: i64) -> Result<bool, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::delete_product(id, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        if order.items.is_empty() {
            return Err(OrderApiError::EmptyOrder);
        }
        let mut tx = self.pool.begin().await?;
        let code = orders::next_order_code(&mut tx).await?;
        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let product = products::fetch_product(item.product_id, &mut tx)
                .await
                .map_err(|e| OrderApiError::DatabaseError(e.to_string()))?
                .ok_or(OrderApiError::ProductNotFound(item.product_id))?;
            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name,
                product_price: product.price,
                quantity: item.quantity.max(1),
                special_instructions: item.special_instructions.clone(),
            });
        }
        let subtotal: Vnd = items.iter().map(|i| i.product_price * i.quantity).sum();
        let delivery_fee = order.delivery_fee.unwrap_or_default();
        let eta = Utc::now() + Duration::minutes(ESTIMATED_DELIVERY_MINUTES);
        let inserted = orders::insert_order(&code, &order, &items, subtotal, delivery_fee, eta, &mut tx).await?;
        tx.commit().await?;
        debug!("📝️ Order [{}] created with id {} for {}", inserted.order_code, inserted.id, inserted.total);
        Ok(inserted)
    }

    async fn fetch_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_key(key, &mut conn).await?)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::search_orders(query, &mut conn).await?)
    }

    async fn update_order(&self, key: &OrderKey, update: OrderUpdate) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(key, &update, &mut conn).await
    }

    async fn update_order_status(
        &self,
        key: &OrderKey,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(key, status, &mut conn).await
    }

    async fn delete_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = orders::delete_order(key, &mut tx).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}

impl PaymentReconciliation for SqliteDatabase {
    async fn attach_provider_transaction(
        &self,
        key: &OrderKey,
        trans_id: &str,
    ) -> Result<Order, ReconciliationApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::attach_provider_transaction(key, trans_id, &mut conn)
            .await?
            .ok_or_else(|| ReconciliationApiError::OrderNotFound(key.to_string()))?;
        debug!("💳️ Provider transaction {trans_id} attached to order [{}]", order.order_code);
        Ok(order)
    }

    async fn record_callback(&self, trans_id: &str, paid: bool) -> Result<CallbackOutcome, ReconciliationApiError> {
        // Nonce insert and order update commit or roll back together. A replayed delivery is
        // detected by the nonce already existing and mutates nothing.
        let mut tx = self.pool.begin().await?;
        nonces::purge_expired(&mut tx).await?;
        if !nonces::try_insert(trans_id, CALLBACK_NONCE_PURPOSE, &mut tx).await? {
            tx.commit().await?;
            debug!("💳️ Replay detected for transaction {trans_id}. No changes applied.");
            return Ok(CallbackOutcome::Replay);
        }
        let outcome = match orders::apply_callback_result(trans_id, paid, &mut tx).await? {
            Some(order) => {
                debug!(
                    "💳️ Callback for transaction {trans_id} applied to order [{}]: payment {}",
                    order.order_code, order.payment_status
                );
                CallbackOutcome::Applied(order)
            },
            None => {
                warn!("💳️ Callback for transaction {trans_id} matches no order.");
                CallbackOutcome::NoMatchingOrder
            },
        };
        tx.commit().await?;
        Ok(outcome)
    }

    async fn apply_poll_result(&self, key: &OrderKey, paid: bool) -> Result<Order, ReconciliationApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_key(key, &mut conn)
            .await?
            .ok_or_else(|| ReconciliationApiError::OrderNotFound(key.to_string()))?;
        let order = orders::apply_poll_result(order.id, paid, &mut conn)
            .await?
            .ok_or_else(|| ReconciliationApiError::OrderNotFound(key.to_string()))?;
        debug!("💳️ Poll result applied to order [{}]: payment {}", order.order_code, order.payment_status);
        Ok(order)
    }
}
