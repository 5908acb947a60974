use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use rsg_common::Vnd;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      Category      ----------------------------------------------------------
/// A menu category. `sort_order` is globally unique and defines the display sequence. It serialises
/// as `order` on the wire.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCategory {
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub image: String,
    /// Requested position. When omitted, the category is appended after the current maximum.
    #[serde(rename = "order", default)]
    pub sort_order: Option<i64>,
}

//--------------------------------------      Product       ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub image: String,
    pub category_id: i64,
    pub price: Vnd,
    pub featured: bool,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub image: String,
    pub category_id: i64,
    pub price: Vnd,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

//--------------------------------------     OrderStatus    ----------------------------------------------------------
/// Fulfilment status labels. This is a plain label set, not a state machine: any label may be
/// replaced by any other via the update endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivering,
    Completed,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::Ready => write!(f, "ready"),
            OrderStatus::Delivering => write!(f, "delivering"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status label: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivering" => Ok(Self::Delivering),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------    PaymentStatus   ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------    PaymentMethod   ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Zalopay,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Zalopay => write!(f, "zalopay"),
        }
    }
}

//--------------------------------------      OrderCode     ----------------------------------------------------------
/// The human-readable order code, e.g. `ORD-003`.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderCode(pub String);

impl FromStr for OrderCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      OrderKey      ----------------------------------------------------------
/// A tagged order reference. Clients may address an order either by its internal id or by its
/// order code; the distinction is resolved once, at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKey {
    ById(i64),
    ByCode(OrderCode),
}

impl FromStr for OrderKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(id) => Ok(Self::ById(id)),
            Err(_) => Ok(Self::ByCode(OrderCode(s.to_string()))),
        }
    }
}

impl Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKey::ById(id) => write!(f, "#{id}"),
            OrderKey::ByCode(code) => write!(f, "{code}"),
        }
    }
}

//--------------------------------------      OrderItem     ----------------------------------------------------------
/// A line item carrying a snapshot of the product's name and price at the time the order was
/// placed.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub product_price: Vnd,
    pub quantity: i64,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

//--------------------------------------        Order       ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_code: OrderCode,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub delivery_address: String,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
    pub subtotal: Vnd,
    pub delivery_fee: Vnd,
    pub total: Vnd,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub provider_trans_id: Option<String>,
    pub special_instructions: Option<String>,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder      ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub delivery_address: String,
    pub items: Vec<NewOrderItem>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_fee: Option<Vnd>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

//--------------------------------------   CallbackOutcome  ----------------------------------------------------------
/// The result of recording a verified provider callback.
#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    /// First delivery: the nonce was recorded and the order was updated.
    Applied(Order),
    /// The transaction id has been seen before. Nothing was mutated.
    Replay,
    /// The nonce was recorded, but no order carries this transaction id.
    NoMatchingOrder,
}
