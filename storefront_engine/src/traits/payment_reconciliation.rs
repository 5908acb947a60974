use thiserror::Error;

use crate::db_types::{CallbackOutcome, Order, OrderKey};

/// Payment-provider reconciliation behaviour a storage backend must provide.
///
/// The provider may deliver the same callback zero, one or many times, and a callback may race a
/// manual status poll. The replay nonce (inserted in the same transaction as the order update) is
/// the sole concurrency control; callback and poll both converge to the same final state when the
/// provider's truth is stable.
#[allow(async_fn_in_trait)]
pub trait PaymentReconciliation {
    /// Record the provider transaction id on the order and mark it as a pending provider payment.
    /// Called after the provider has accepted the create request.
    async fn attach_provider_transaction(
        &self,
        key: &OrderKey,
        trans_id: &str,
    ) -> Result<Order, ReconciliationApiError>;

    /// Record a *verified* callback, atomically:
    /// * purge expired nonces,
    /// * insert the transaction id as a nonce; if it is already present, the delivery is a replay
    ///   and nothing is mutated,
    /// * update the order carrying this transaction id (`paid` + `completed` on success, `failed`
    ///   otherwise).
    ///
    /// A storage failure rolls the nonce back with the order update, so a provider retry can still
    /// land.
    async fn record_callback(&self, trans_id: &str, paid: bool) -> Result<CallbackOutcome, ReconciliationApiError>;

    /// Apply the result of an active status poll: `paid` sets `paid` + `completed` regardless of
    /// prior state, otherwise the payment status reverts to `pending`.
    async fn apply_poll_result(&self, key: &OrderKey, paid: bool) -> Result<Order, ReconciliationApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(String),
}

impl From<sqlx::Error> for ReconciliationApiError {
    fn from(e: sqlx::Error) -> Self {
        ReconciliationApiError::DatabaseError(e.to_string())
    }
}
