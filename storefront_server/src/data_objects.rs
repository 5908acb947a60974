use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_engine::{
    db_types::{Order, OrderCode, OrderStatus, PaymentStatus},
    sfe_api::{OrderQueryFilter, ReorderEntry},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Body of a bulk (drag-and-drop) category reorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub categories: Vec<ReorderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// The query-string shape of the admin order listing. Translated into an
/// [`OrderQueryFilter`] once at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSearchQuery {
    pub order_id: Option<String>,
    pub phone: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl OrderSearchQuery {
    pub fn into_filter(self) -> OrderQueryFilter {
        let limit = self.limit.unwrap_or(50).max(1);
        let page = self.page.unwrap_or(1).max(1);
        OrderQueryFilter {
            order_code: self.order_id.map(OrderCode::from),
            customer_phone: self.phone,
            status: self.status.map(|s| vec![s]),
            payment_status: self.payment_status,
            since: self.since,
            until: self.until,
            offset: Some((page - 1) * limit),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreateRequest {
    pub order_id: String,
    /// Identifier presented to the provider. Defaults to the customer's phone, then email, then
    /// "guest".
    #[serde(default)]
    pub app_user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusRequest {
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreatedResponse {
    /// The provider's hosted payment page; the browser is redirected here.
    pub payment_url: String,
    pub app_trans_id: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub paid: bool,
    pub order: Order,
}

/// The body the provider expects back from its callback. `return_code` 1 acknowledges the
/// delivery (stopping retries), anything else rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub return_code: i64,
    pub return_message: String,
}

impl CallbackResponse {
    pub fn acknowledged<S: Display>(message: S) -> Self {
        Self { return_code: 1, return_message: message.to_string() }
    }

    pub fn rejected<S: Display>(message: S) -> Self {
        Self { return_code: 0, return_message: message.to_string() }
    }
}
