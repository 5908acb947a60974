use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderKey, OrderStatus},
    sfe_api::{OrderQueryFilter, OrderUpdate},
    traits::{OrderApiError, OrderManagement},
};

/// `OrderApi` handles checkout and order administration.
pub struct OrderApi<B> {
    db: B,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    /// Place a new order. Product names and prices are snapshotted into the order at this moment;
    /// later catalog edits do not rewrite history.
    pub async fn place_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let order = self.db.create_order(order).await?;
        info!("🔄️📦️ Order [{}] placed. Total: {}", order.order_code, order.total);
        Ok(order)
    }

    pub async fn order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError> {
        self.db.fetch_order(key).await
    }

    pub async fn search(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        trace!("🔄️📦️ Searching orders. {query}");
        self.db.search_orders(query).await
    }

    pub async fn update_order(&self, key: &OrderKey, update: OrderUpdate) -> Result<Option<Order>, OrderApiError> {
        self.db.update_order(key, update).await
    }

    pub async fn update_status(&self, key: &OrderKey, status: OrderStatus) -> Result<Option<Order>, OrderApiError> {
        let order = self.db.update_order_status(key, status).await?;
        if let Some(order) = &order {
            info!("🔄️📦️ Order [{}] status set to {status}", order.order_code);
        }
        Ok(order)
    }

    pub async fn delete_order(&self, key: &OrderKey) -> Result<Option<Order>, OrderApiError> {
        let order = self.db.delete_order(key).await?;
        if let Some(order) = &order {
            info!("🔄️📦️ Order [{}] deleted", order.order_code);
        }
        Ok(order)
    }
}
