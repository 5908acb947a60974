use std::sync::Arc;

use chrono::Utc;
use log::*;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::ZaloPayConfig,
    data_objects::{CallbackData, CreateOrderResponse, QueryOrderResponse, SignedCreateRequest},
    helpers,
    ZaloPayApiError,
};

#[derive(Clone)]
pub struct ZaloPayApi {
    config: ZaloPayConfig,
    client: Arc<Client>,
}

impl ZaloPayApi {
    pub fn new(config: ZaloPayConfig) -> Result<Self, ZaloPayApiError> {
        let client = Client::builder().build().map_err(|e| ZaloPayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Build a client from the `PAY_*` environment variables. Fails with a configuration error as
    /// soon as one of them is missing.
    pub fn from_env() -> Result<Self, ZaloPayApiError> {
        Self::new(ZaloPayConfig::try_from_env()?)
    }

    pub fn config(&self) -> &ZaloPayConfig {
        &self.config
    }

    /// Build and sign a create request. No network activity happens here; the caller submits the
    /// result with [`Self::create_order`] and must not mutate it in between, since the MAC covers
    /// the signed fields.
    pub fn sign_create_request(
        &self,
        order_code: &str,
        amount: i64,
        app_user: &str,
        description: &str,
        items: &[Value],
        embed_data: Value,
    ) -> Result<SignedCreateRequest, ZaloPayApiError> {
        if amount <= 0 {
            return Err(ZaloPayApiError::InvalidAmount(amount));
        }
        let app_trans_id = helpers::new_app_trans_id(Some(order_code));
        let app_time = Utc::now().timestamp_millis();
        let item = serde_json::to_string(items).map_err(|e| ZaloPayApiError::JsonError(e.to_string()))?;
        let embed_data = serde_json::to_string(&embed_data).map_err(|e| ZaloPayApiError::JsonError(e.to_string()))?;
        let payload = helpers::create_mac_payload(
            self.config.app_id,
            &app_trans_id,
            app_user,
            amount,
            app_time,
            &embed_data,
            &item,
        );
        let mac = helpers::hmac_sha256_hex(self.config.mac_key.reveal(), &payload);
        Ok(SignedCreateRequest {
            app_id: self.config.app_id,
            app_trans_id,
            app_user: app_user.to_string(),
            app_time,
            amount,
            embed_data,
            item,
            description: description.to_string(),
            callback_url: self.config.callback_url(),
            mac,
        })
    }

    /// Submit a signed create request to `POST /v2/create` (form-encoded). A non-2xx response is
    /// surfaced as a provider error; the caller has mutated nothing locally at that point, so
    /// retrying is safe.
    pub async fn create_order(&self, request: &SignedCreateRequest) -> Result<CreateOrderResponse, ZaloPayApiError> {
        let url = self.url("/v2/create");
        trace!("💳️ POST {url} for transaction {}", request.app_trans_id);
        let response =
            self.client.post(&url).form(request).send().await.map_err(|e| ZaloPayApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            response.json::<CreateOrderResponse>().await.map_err(|e| ZaloPayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ZaloPayApiError::RequestError(e.to_string()))?;
            Err(ZaloPayApiError::ProviderError { status, message })
        }
    }

    /// Query the provider for the current state of a transaction (`POST /v2/query`). This is the
    /// fallback reconciliation path when the callback is delayed or lost.
    pub async fn query_order(&self, app_trans_id: &str) -> Result<QueryOrderResponse, ZaloPayApiError> {
        let key1 = self.config.mac_key.reveal();
        let mac = helpers::hmac_sha256_hex(key1, &helpers::query_mac_payload(self.config.app_id, app_trans_id, key1));
        let form = [
            ("app_id", self.config.app_id.to_string()),
            ("app_trans_id", app_trans_id.to_string()),
            ("mac", mac),
        ];
        let url = self.url("/v2/query");
        trace!("💳️ POST {url} for transaction {app_trans_id}");
        let response =
            self.client.post(&url).form(&form).send().await.map_err(|e| ZaloPayApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            response.json::<QueryOrderResponse>().await.map_err(|e| ZaloPayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ZaloPayApiError::RequestError(e.to_string()))?;
            Err(ZaloPayApiError::ProviderError { status, message })
        }
    }

    /// Verify an inbound callback. Returns `None` when the MAC does not authenticate the raw
    /// `data` string under `key2`. A verified payload that fails to parse yields a
    /// [`CallbackData`] with no transaction id, which callers reject without mutating anything.
    pub fn verify_callback(&self, data: &str, mac: &str) -> Option<CallbackData> {
        if !helpers::verify_hex_mac(self.config.callback_key.reveal(), data, mac) {
            warn!("💳️ Callback MAC verification failed");
            return None;
        }
        Some(serde_json::from_str(data).unwrap_or_default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.provider_base_url.trim_end_matches('/'))
    }
}
