//! # Restaurant storefront gateway server
//! This module hosts the HTTP server for the restaurant storefront. It is responsible for:
//! serving the category/product catalog, taking checkout orders, and driving the three-phase
//! payment flow (create, callback, status poll) against the payment provider.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information. Payment-provider credentials (`PAY_*`) are read at call time, not at startup.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: a health check route that returns a 200 OK response.
//! * `/api/categories`, `/api/products`, `/api/orders`: catalog and order CRUD.
//! * `/api/categories/reorder` and `/api/admin/fix_category_orders`: the ordinal sequence tools.
//! * `/api/payments/{create,callback,status}`: the payment reconciliation protocol.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod payment_routes;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
