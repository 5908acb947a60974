use std::env;

use rsg_common::Secret;

use crate::ZaloPayApiError;

#[derive(Debug, Clone, Default)]
pub struct ZaloPayConfig {
    /// The numeric merchant app id assigned by ZaloPay.
    pub app_id: u32,
    /// `key1`: signs outbound create/query requests.
    pub mac_key: Secret<String>,
    /// `key2`: authenticates inbound callbacks.
    pub callback_key: Secret<String>,
    /// Base URL of the provider API, e.g. `https://sb-openapi.zalopay.vn`.
    pub provider_base_url: String,
    /// Public base URL of this deployment; the callback URL is derived from it.
    pub app_base_url: String,
}

impl ZaloPayConfig {
    /// Read the full provider configuration, failing on the first missing or malformed variable.
    /// Called per payment request, never cached, so an operator can fix the environment without a
    /// restart losing the error context.
    pub fn try_from_env() -> Result<Self, ZaloPayApiError> {
        let app_id = require_env("PAY_APP_ID")?
            .parse::<u32>()
            .map_err(|e| ZaloPayApiError::Configuration(format!("PAY_APP_ID is not a number: {e}")))?;
        let mac_key = Secret::new(require_env("PAY_MAC_KEY")?);
        let callback_key = Secret::new(require_env("PAY_CALLBACK_KEY")?);
        let provider_base_url = require_env("PAY_PROVIDER_BASE_URL")?;
        let app_base_url = require_env("APP_BASE_URL")?;
        Ok(Self { app_id, mac_key, callback_key, provider_base_url, app_base_url })
    }

    /// The absolute URL the provider must call back on.
    pub fn callback_url(&self) -> String {
        format!("{}/api/payments/callback", self.app_base_url.trim_end_matches('/'))
    }
}

fn require_env(name: &str) -> Result<String, ZaloPayApiError> {
    env::var(name).map_err(|_| ZaloPayApiError::Configuration(format!("Missing required env: {name}")))
}
