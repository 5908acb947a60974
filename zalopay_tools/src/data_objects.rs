use serde::{Deserialize, Serialize};

/// `return_code` value signalling success, in provider responses and callback payloads alike.
pub const ZALOPAY_SUCCESS_CODE: i64 = 1;

/// The full, signed body of a `/v2/create` call. Field names follow the provider's wire format;
/// the whole struct is submitted form-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedCreateRequest {
    pub app_id: u32,
    /// Unique per calendar day: `{yymmdd}_{suffix}`.
    pub app_trans_id: String,
    pub app_user: String,
    /// Creation timestamp in milliseconds.
    pub app_time: i64,
    pub amount: i64,
    /// JSON-encoded object; echoed back by the provider.
    pub embed_data: String,
    /// JSON-encoded array of line items.
    pub item: String,
    pub description: String,
    pub callback_url: String,
    /// Hex-encoded HMAC-SHA256 over the canonical payload, signed with `key1`.
    pub mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub return_code: i64,
    #[serde(default)]
    pub return_message: String,
    #[serde(default)]
    pub sub_return_message: String,
    /// URL of the hosted payment page the customer is redirected to.
    pub order_url: Option<String>,
    pub zp_trans_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOrderResponse {
    pub return_code: i64,
    #[serde(default)]
    pub return_message: String,
    #[serde(default)]
    pub is_processing: bool,
    #[serde(default)]
    pub amount: i64,
    pub zp_trans_id: Option<i64>,
}

impl QueryOrderResponse {
    pub fn is_paid(&self) -> bool {
        self.return_code == ZALOPAY_SUCCESS_CODE
    }
}

/// The outer callback body: an opaque `data` string and its MAC. The MAC is verified over the raw
/// string *before* `data` is parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackEnvelope {
    pub data: Option<String>,
    pub mac: Option<String>,
}

/// The fields of interest inside a verified callback `data` payload. The provider sends more;
/// everything else is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackData {
    pub app_trans_id: Option<String>,
    #[serde(default)]
    pub return_code: i64,
    #[serde(default)]
    pub amount: i64,
}

impl CallbackData {
    pub fn is_success(&self) -> bool {
        self.return_code == ZALOPAY_SUCCESS_CODE
    }
}
