use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CallbackOutcome, Order, OrderKey},
    traits::{PaymentReconciliation, ReconciliationApiError},
};

/// `PaymentFlowApi` is the engine-side half of the payment reconciliation protocol. The wire-level
/// half (signing, verification, the provider network calls) lives outside the engine; by the time
/// a call lands here, its authenticity has already been established.
pub struct PaymentFlowApi<B> {
    db: B,
}

impl<B> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B> PaymentFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> PaymentFlowApi<B>
where B: PaymentReconciliation
{
    /// Record the provider transaction id against the order once the provider has accepted the
    /// create request. The order becomes a pending provider payment.
    pub async fn register_pending_payment(
        &self,
        key: &OrderKey,
        trans_id: &str,
    ) -> Result<Order, ReconciliationApiError> {
        let order = self.db.attach_provider_transaction(key, trans_id).await?;
        info!("🔄️💳️ Order [{}] awaits provider payment under transaction {trans_id}", order.order_code);
        Ok(order)
    }

    /// Record a verified callback. Replays resolve to [`CallbackOutcome::Replay`] and mutate
    /// nothing; the caller still answers the provider with success so it stops retrying.
    pub async fn record_callback(
        &self,
        trans_id: &str,
        paid: bool,
    ) -> Result<CallbackOutcome, ReconciliationApiError> {
        let outcome = self.db.record_callback(trans_id, paid).await?;
        match &outcome {
            CallbackOutcome::Applied(order) => {
                info!("🔄️💳️ Callback applied: order [{}] payment is {}", order.order_code, order.payment_status)
            },
            CallbackOutcome::Replay => info!("🔄️💳️ Duplicate callback for {trans_id} ignored"),
            CallbackOutcome::NoMatchingOrder => warn!("🔄️💳️ Callback for {trans_id} matches no order"),
        }
        Ok(outcome)
    }

    /// Apply the outcome of an active status poll against the provider.
    pub async fn apply_poll_result(&self, key: &OrderKey, paid: bool) -> Result<Order, ReconciliationApiError> {
        self.db.apply_poll_result(key, paid).await
    }
}
