//! pushsync - push server and key tooling for push subscription reconciliation.
//!
//! The browser controller compares its subscription's key with whatever
//! `/pubkey` serves. This crate owns the other side of that string: it
//! generates the server key, derives the served form, serves it together with
//! the page, and checks a running server's `/pubkey` and `/register` routes.
//!
//! # Modules
//!
//! - [`keys`] - P-256 key generation and PEM storage
//! - [`api`] - HTTP client for `/pubkey` and `/register`
//! - [`commands`] - subcommand implementations
//! - [`server`] - the push server: `/pubkey`, `/register`, `/auth/start`, page assets
//! - [`config`] - defaults, environment and flag overrides

pub mod api;
pub mod commands;
pub mod config;
pub mod constants;
pub mod keys;
pub mod server;

pub use api::ApiClient;
pub use config::Config;
pub use keys::ServerKey;
pub use server::{EndpointRegistry, ServerState};
