use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{OrderCode, OrderStatus, PaymentStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub order_code: Option<OrderCode>,
    pub customer_phone: Option<String>,
    pub status: Option<Vec<OrderStatus>>,
    pub payment_status: Option<PaymentStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl OrderQueryFilter {
    pub fn with_order_code(mut self, code: OrderCode) -> Self {
        self.order_code = Some(code);
        self
    }

    pub fn with_customer_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.order_code.is_none() &&
            self.customer_phone.is_none() &&
            self.status.is_none() &&
            self.payment_status.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(code) = &self.order_code {
            write!(f, "order_code: {code}. ")?;
        }
        if let Some(phone) = &self.customer_phone {
            write!(f, "customer_phone: {phone}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        if let Some(ps) = &self.payment_status {
            write!(f, "payment_status: {ps}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        Ok(())
    }
}

/// The closed set of fields an order edit may touch. Everything else on the record (totals, line
/// items, the provider transaction id) is owned by checkout and the payment flow and cannot be
/// modified through the update endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderUpdate {
    pub new_customer_name: Option<String>,
    pub new_customer_phone: Option<String>,
    pub new_customer_email: Option<String>,
    pub new_delivery_address: Option<String>,
    pub new_status: Option<OrderStatus>,
    pub new_payment_status: Option<PaymentStatus>,
    pub new_special_instructions: Option<String>,
    pub new_estimated_delivery_time: Option<DateTime<Utc>>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.new_customer_name.is_none() &&
            self.new_customer_phone.is_none() &&
            self.new_customer_email.is_none() &&
            self.new_delivery_address.is_none() &&
            self.new_status.is_none() &&
            self.new_payment_status.is_none() &&
            self.new_special_instructions.is_none() &&
            self.new_estimated_delivery_time.is_none()
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.new_status = Some(status);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.new_payment_status = Some(status);
        self
    }
}
