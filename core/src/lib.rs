//! Push subscription reconciliation for a browser page.
//!
//! Keeps the browser's push subscription consistent with the key the server
//! currently hands out, and the server's endpoint registry consistent with the
//! browser's actual subscription.
//!
//! # Flow
//!
//! ```text
//! Controller.start()
//!     │
//!     ├── KeyFetcher ──────────── GET /pubkey
//!     ├── inspect(PushPlatform) ─ worker ready → current subscription
//!     ├── keys_match() ────────── URL-safe encoding vs served key
//!     │
//!     ├── none      → offer Subscribe
//!     ├── stale     → release it, offer Subscribe
//!     └── current   → EndpointRegistrar (POST /register), offer Unsubscribe
//! ```
//!
//! Platform access goes through the traits in [`platform`], so the engine runs
//! the same against the browser bindings and against test fakes.

// Rust guideline compliant 2026-02

pub mod auth;
pub mod config;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod key;
pub mod platform;

#[cfg(test)]
mod testing;

pub use auth::AuthGate;
pub use config::ControllerConfig;
pub use controller::{Affordance, ControlView, Controller};
pub use engine::{ReconciliationEngine, SubscriptionState};
pub use error::{PushError, Result};
pub use key::{keys_match, url_safe_encoding, PublicKey};
pub use platform::{EndpointRegistrar, KeyFetcher, PushPlatform, RegistrationRequest, Subscription};
