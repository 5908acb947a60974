//! Storefront Engine
//!
//! The storefront engine holds the persistent state of the restaurant storefront: the
//! category/product catalog with its ordinal display sequence, customer orders, and the
//! payment-reconciliation state (provider transaction ids and replay nonces).
//!
//! The library is divided into two main sections:
//! 1. Database management and control. SQLite is the supported backend. You should never need to
//!    access the database directly; use the public API instead. The exception is the data types,
//!    which are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`mod@sfe_api`]). Backends implement the traits in [`mod@traits`] to
//!    drive it; the server injects a single backend handle, opened once at process start.
pub mod db_types;
pub mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{db, SqliteDatabase};
pub use sfe_api::{catalog_api::CatalogApi, order_api::OrderApi, payment_flow_api::PaymentFlowApi};
