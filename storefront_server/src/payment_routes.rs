//----------------------------------------------   Payments  ----------------------------------------------------
//! The three phases of the provider payment flow: create, callback, status poll.
//!
//! Callback responses must always be in the 200 range, otherwise the provider keeps retrying; a
//! delivery is rejected by answering `return_code: 0` in the body, never by an HTTP error.

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::*;
use serde_json::json;
use storefront_engine::{
    db_types::CallbackOutcome,
    traits::{OrderManagement, PaymentReconciliation},
    OrderApi,
    PaymentFlowApi,
};
use zalopay_tools::{CallbackEnvelope, ZaloPayApi};

use crate::{
    config::ServerOptions,
    data_objects::{CallbackResponse, PaymentCreateRequest, PaymentCreatedResponse, PaymentStatusRequest,
        PaymentStatusResponse},
    errors::ServerError,
    helpers::{get_remote_ip, require_https},
    route,
    routes::parse_order_key,
};

route!(create_payment => Post "/payments/create" impl OrderManagement, PaymentReconciliation);
pub async fn create_payment<BOrd, BPay>(
    req: HttpRequest,
    body: web::Json<PaymentCreateRequest>,
    orders: web::Data<OrderApi<BOrd>>,
    payments: web::Data<PaymentFlowApi<BPay>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    BOrd: OrderManagement,
    BPay: PaymentReconciliation,
{
    require_https(&req, options.enforce_https)?;
    let request = body.into_inner();
    let key = parse_order_key(&request.order_id)?;
    debug!("💳️ POST create payment for order {key}");
    let order = orders.order(&key).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    let amount = order.total.value();
    if amount <= 0 {
        return Err(ServerError::InvalidRequestBody(format!("Invalid order total: {}", order.total)));
    }

    // Configuration is read here, per request, so a missing variable surfaces on the call that
    // needed it instead of as an opaque startup failure.
    let provider = ZaloPayApi::from_env()?;
    let app_user = request
        .app_user
        .or_else(|| Some(order.customer_phone.clone()).filter(|p| !p.is_empty()))
        .or_else(|| order.customer_email.clone())
        .unwrap_or_else(|| "guest".to_string());
    let description = format!("Thanh toán đơn hàng {}", order.order_code);
    let embed_data = json!({
        "redirect_url": format!(
            "{}/order-success?orderId={}&source=zalopay",
            provider.config().app_base_url.trim_end_matches('/'),
            order.order_code
        ),
        "merchant_info": "web",
    });
    let mut items = order
        .items
        .iter()
        .map(|item| {
            json!({
                "name": item.product_name,
                "price": item.product_price.value(),
                "quantity": item.quantity,
            })
        })
        .collect::<Vec<_>>();
    if order.delivery_fee.is_positive() {
        items.push(json!({"name": "Delivery fee", "price": order.delivery_fee.value(), "quantity": 1}));
    }

    let signed =
        provider.sign_create_request(order.order_code.as_str(), amount, &app_user, &description, &items, embed_data)?;
    let response = provider.create_order(&signed).await.map_err(|e| {
        warn!("💳️ Provider create call failed for order {key}. {e}");
        ServerError::from(e)
    })?;
    let payment_url = response.order_url.clone().ok_or_else(|| {
        warn!("💳️ Provider refused the create request for order {key}: {}", response.return_message);
        ServerError::PaymentProviderError(response.return_message.clone())
    })?;

    // Only now, with the provider committed, does the order record change.
    payments.register_pending_payment(&key, &signed.app_trans_id).await?;
    Ok(HttpResponse::Ok().json(PaymentCreatedResponse {
        payment_url,
        app_trans_id: signed.app_trans_id,
        token: response.zp_trans_token,
    }))
}

route!(payment_callback => Post "/payments/callback" impl PaymentReconciliation);
pub async fn payment_callback<B: PaymentReconciliation>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentFlowApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let remote = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    trace!("💳️ Callback received from {remote:?}");
    if require_https(&req, options.enforce_https).is_err() {
        warn!("💳️ Callback arrived over plaintext; rejecting.");
        return Ok(HttpResponse::Ok().json(CallbackResponse::rejected("internal error")));
    }
    let envelope = parse_callback_envelope(&req, &body);
    let (data, mac) = match (envelope.data, envelope.mac) {
        (Some(data), Some(mac)) => (data, mac),
        _ => return Err(ServerError::InvalidRequestBody("Missing data/mac".to_string())),
    };
    let provider = match ZaloPayApi::from_env() {
        Ok(provider) => provider,
        Err(e) => {
            error!("💳️ Callback cannot be verified without configuration. {e}");
            return Ok(HttpResponse::Ok().json(CallbackResponse::rejected("internal error")));
        },
    };
    let parsed = match provider.verify_callback(&data, &mac) {
        Some(parsed) => parsed,
        None => {
            warn!("💳️ Callback signature from {remote:?} is invalid.");
            return Ok(HttpResponse::Ok().json(CallbackResponse::rejected("invalid signature")));
        },
    };
    let trans_id = match parsed.app_trans_id.as_deref() {
        Some(id) => id,
        None => {
            warn!("💳️ Verified callback carries no app_trans_id.");
            return Ok(HttpResponse::Ok().json(CallbackResponse::rejected("missing app_trans_id")));
        },
    };
    match api.record_callback(trans_id, parsed.is_success()).await {
        Ok(CallbackOutcome::Replay) => Ok(HttpResponse::Ok().json(CallbackResponse::acknowledged("ok"))),
        Ok(_) => Ok(HttpResponse::Ok().json(CallbackResponse::acknowledged("success"))),
        Err(e) => {
            // The nonce rolled back with the order update, so the provider's retry is welcome.
            error!("💳️ Could not record callback for {trans_id}. {e}");
            Ok(HttpResponse::Ok().json(CallbackResponse::rejected("internal error")))
        },
    }
}

route!(payment_status => Post "/payments/status" impl OrderManagement, PaymentReconciliation);
pub async fn payment_status<BOrd, BPay>(
    req: HttpRequest,
    body: web::Json<PaymentStatusRequest>,
    orders: web::Data<OrderApi<BOrd>>,
    payments: web::Data<PaymentFlowApi<BPay>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    BOrd: OrderManagement,
    BPay: PaymentReconciliation,
{
    require_https(&req, options.enforce_https)?;
    let key = parse_order_key(&body.into_inner().order_id)?;
    debug!("💳️ POST status poll for order {key}");
    let order = orders.order(&key).await?.ok_or(ServerError::NoRecordFound(format!("Order {key}")))?;
    let trans_id = order
        .provider_trans_id
        .ok_or_else(|| ServerError::InvalidRequestBody(format!("Order {key} has no provider transaction")))?;
    let provider = ZaloPayApi::from_env()?;
    let response = provider.query_order(&trans_id).await.map_err(|e| {
        warn!("💳️ Provider query call failed for order {key}. {e}");
        ServerError::from(e)
    })?;
    let paid = response.is_paid();
    let order = payments.apply_poll_result(&key, paid).await?;
    Ok(HttpResponse::Ok().json(PaymentStatusResponse { paid, order }))
}

/// The provider may deliver the callback as JSON or form-encoded; an unparseable body resolves to
/// an empty envelope, which the caller rejects for the missing fields.
fn parse_callback_envelope(req: &HttpRequest, body: &web::Bytes) -> CallbackEnvelope {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if content_type.contains("application/json") {
        serde_json::from_slice(body).unwrap_or_default()
    } else if content_type.contains("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).unwrap_or_default()
    } else {
        serde_json::from_slice(body)
            .ok()
            .or_else(|| serde_urlencoded::from_bytes(body).ok())
            .unwrap_or_default()
    }
}
