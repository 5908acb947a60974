//! # ZaloPay tools
//!
//! A small client for the ZaloPay v2 merchant API, covering the three interactions the storefront
//! needs:
//! * signing and submitting a create-payment request (`POST /v2/create`),
//! * verifying the HMAC on an inbound payment callback,
//! * querying the current state of a transaction (`POST /v2/query`).
//!
//! Both MAC keys are shared secrets. `key1` (`PAY_MAC_KEY`) signs everything the merchant sends to
//! ZaloPay; `key2` (`PAY_CALLBACK_KEY`) authenticates what ZaloPay sends back. Configuration is
//! read from the environment at call time, so a missing variable surfaces as a configuration
//! error on the request that needed it rather than at startup.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::ZaloPayApi;
pub use config::ZaloPayConfig;
pub use data_objects::{
    CallbackData,
    CallbackEnvelope,
    CreateOrderResponse,
    QueryOrderResponse,
    SignedCreateRequest,
    ZALOPAY_SUCCESS_CODE,
};
pub use error::ZaloPayApiError;
