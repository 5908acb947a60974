//! Signing and verification primitives for the ZaloPay protocol.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// ZaloPay dates its transaction ids in Vietnam time, regardless of where the server runs.
const VIETNAM_UTC_OFFSET_HOURS: i64 = 7;

/// Hex-encoded HMAC-SHA256 of `data` under `key`.
pub fn hmac_sha256_hex(key: &str, data: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex-encoded MAC against `data`. The comparison of the digests is constant-time; a MAC
/// of the wrong length or with non-hex characters fails without further inspection.
pub fn verify_hex_mac(key: &str, data: &str, provided_mac: &str) -> bool {
    let provided = match hex::decode(provided_mac) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    mac.verify_slice(&provided).is_ok()
}

/// The canonical string signed into the `mac` field of a create request. Field order is fixed by
/// the provider: `app_id|app_trans_id|app_user|amount|app_time|embed_data|item`.
pub fn create_mac_payload(
    app_id: u32,
    app_trans_id: &str,
    app_user: &str,
    amount: i64,
    app_time: i64,
    embed_data: &str,
    item: &str,
) -> String {
    format!("{app_id}|{app_trans_id}|{app_user}|{amount}|{app_time}|{embed_data}|{item}")
}

/// The canonical string signed into the `mac` field of a query request:
/// `app_id|app_trans_id|key1`. Note that the key appears in the payload *and* signs it.
pub fn query_mac_payload(app_id: u32, app_trans_id: &str, key1: &str) -> String {
    format!("{app_id}|{app_trans_id}|{key1}")
}

/// A provider transaction id, unique per calendar day: `{yymmdd}_{6-char-suffix}`. The suffix is
/// the tail of the order code when it is long enough, otherwise random hex.
pub fn new_app_trans_id(order_code: Option<&str>) -> String {
    let vn_now = Utc::now() + Duration::hours(VIETNAM_UTC_OFFSET_HOURS);
    let day = vn_now.format("%y%m%d");
    let suffix = match order_code {
        Some(code) if code.is_ascii() && code.len() >= 6 => code[code.len() - 6..].to_string(),
        _ => {
            let bytes: [u8; 3] = rand::thread_rng().gen();
            hex::encode(bytes)
        },
    };
    format!("{day}_{suffix}")
}
