use std::env;

use log::*;
use rsg_common::{parse_boolean_flag, Vnd};
use storefront_engine::db::db_url;

const DEFAULT_RSG_HOST: &str = "127.0.0.1";
const DEFAULT_RSG_PORT: u16 = 8360;
const DEFAULT_DELIVERY_FEE: i64 = 20_000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address,
    /// rather than the connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather
    /// than the connection's remote address.
    pub use_forwarded: bool,
    /// When true, payment create/status requests arriving with an explicit non-HTTPS
    /// X-Forwarded-Proto header are refused before any provider call is made.
    pub enforce_https: bool,
    /// Default delivery fee charged at checkout when the client does not supply one.
    pub delivery_fee: Vnd,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RSG_HOST.to_string(),
            port: DEFAULT_RSG_PORT,
            database_url: String::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            enforce_https: true,
            delivery_fee: Vnd::from(DEFAULT_DELIVERY_FEE),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RSG_HOST").ok().unwrap_or_else(|| DEFAULT_RSG_HOST.into());
        let port = env::var("RSG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RSG_PORT. {e} Using the default, {DEFAULT_RSG_PORT}, instead."
                    );
                    DEFAULT_RSG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RSG_PORT);
        let database_url = db_url();
        let use_x_forwarded_for = parse_boolean_flag(env::var("RSG_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("RSG_USE_FORWARDED").ok(), false);
        let enforce_https = parse_boolean_flag(env::var("RSG_ENFORCE_HTTPS").ok(), true);
        if !enforce_https {
            warn!("🚨️ HTTPS enforcement is disabled. Do not run a production instance like this.");
        }
        let delivery_fee = env::var("RSG_DELIVERY_FEE")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for RSG_DELIVERY_FEE. {e}"))
                    .ok()
            })
            .map(Vnd::from)
            .unwrap_or_else(|| Vnd::from(DEFAULT_DELIVERY_FEE));
        Self { host, port, database_url, use_x_forwarded_for, use_forwarded, enforce_https, delivery_fee }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that handlers need at request time. Generally we try to
/// keep this as small as possible, and exclude secrets to avoid passing sensitive information
/// around the system.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
    pub enforce_https: bool,
    pub delivery_fee: Vnd,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            use_x_forwarded_for: config.use_x_forwarded_for,
            use_forwarded: config.use_forwarded,
            enforce_https: config.enforce_https,
            delivery_fee: config.delivery_fee,
        }
    }
}
