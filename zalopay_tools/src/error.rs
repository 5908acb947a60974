use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZaloPayApiError {
    #[error("Invalid payment configuration. {0}")]
    Configuration(String),
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Provider request failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Provider call failed. Error {status}. {message}")]
    ProviderError { status: u16, message: String },
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(i64),
}
