use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderKey, OrderStatus},
    sfe_api::{OrderQueryFilter, OrderUpdate},
};

/// Order behaviour a storage backend must provide. Orders are addressed through the tagged
/// [`OrderKey`] everywhere; backends resolve it, callers never re-detect the id shape.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Create an order from a checkout request, in a single atomic transaction:
    /// * assign the next `ORD-nnn` order code,
    /// * snapshot the current name and price of every referenced product,
    /// * compute `subtotal + delivery_fee = total`.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    async fn fetch_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError>;

    /// Fetch orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;

    /// Apply a validated partial update.
    async fn update_order(&self, key: &OrderKey, update: OrderUpdate) -> Result<Option<Order>, OrderApiError>;

    async fn update_order_status(&self, key: &OrderKey, status: OrderStatus)
        -> Result<Option<Order>, OrderApiError>;

    /// Hard-delete an order (admin action). Returns the deleted record.
    async fn delete_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The requested product (id {0}) does not exist")]
    ProductNotFound(i64),
    #[error("An order must contain at least one item")]
    EmptyOrder,
    #[error("The requested update would result in a no-op.")]
    ModificationNoOp,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
