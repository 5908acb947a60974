use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use storefront_engine::traits::{CatalogApiError, OrderApiError, ReconciliationApiError};
use thiserror::Error;
use zalopay_tools::ZaloPayApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The payment provider could not be reached. {0}")]
    PaymentProviderError(String),
    #[error("HTTPS is required")]
    HttpsRequired,
    #[error("The category ordering is in conflict and needs repair. {0}")]
    OrderingConflict(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::HttpsRequired => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderingConflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::OrderingConflict(msg) => Self::OrderingConflict(msg),
            CatalogApiError::CategoryNotFound(id) => Self::NoRecordFound(format!("Category {id}")),
            CatalogApiError::ModificationNoOp => Self::InvalidRequestBody("No fields to update".to_string()),
            CatalogApiError::DatabaseError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::ProductNotFound(_) => Self::InvalidRequestBody(e.to_string()),
            OrderApiError::EmptyOrder => Self::InvalidRequestBody(e.to_string()),
            OrderApiError::ModificationNoOp => Self::InvalidRequestBody("No fields to update".to_string()),
            OrderApiError::DatabaseError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<ReconciliationApiError> for ServerError {
    fn from(e: ReconciliationApiError) -> Self {
        match e {
            ReconciliationApiError::OrderNotFound(key) => Self::NoRecordFound(format!("Order {key}")),
            ReconciliationApiError::DatabaseError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<ZaloPayApiError> for ServerError {
    fn from(e: ZaloPayApiError) -> Self {
        match e {
            ZaloPayApiError::Configuration(msg) => Self::ConfigurationError(msg),
            ZaloPayApiError::InvalidAmount(_) => Self::InvalidRequestBody(e.to_string()),
            ZaloPayApiError::ProviderError { .. } |
            ZaloPayApiError::RequestError(_) |
            ZaloPayApiError::JsonError(_) |
            ZaloPayApiError::Initialization(_) => Self::PaymentProviderError(e.to_string()),
        }
    }
}
