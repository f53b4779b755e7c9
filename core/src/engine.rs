//! Subscription reconciliation state machine.
//!
//! # Transitions
//!
//! ```text
//!                 reconcile()
//!   fetch key ──► inspect ──┬── none ────────────► NoSubscription
//!                           ├── key differs ─────► SubscriptionStale (released once)
//!                           └── key matches ─────► SubscriptionCurrent (endpoint re-registered)
//!
//!   NoSubscription / released SubscriptionStale ──subscribe()──► SubscriptionCurrent
//!   SubscriptionCurrent ──unsubscribe()──► NoSubscription, then reconcile() again
//! ```
//!
//! Only one operation runs at a time. A call made while another is pending
//! returns [`PushError::Busy`] without touching the network or the platform.

// Rust guideline compliant 2026-02

use std::cell::{Cell, RefCell};

use crate::constants::WORKER_SCRIPT;
use crate::error::{PushError, Result};
use crate::inspect::{inspect, Inspection};
use crate::key::{keys_match, url_safe_encoding, PublicKey};
use crate::platform::{EndpointRegistrar, KeyFetcher, PushPlatform, Subscription};

/// Where the browser's subscription stands relative to the server key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionState {
    /// No subscription exists. Nothing is done until the user opts in.
    NoSubscription,
    /// A subscription existed under a different key.
    SubscriptionStale {
        /// Whether the platform confirmed the stale subscription was released.
        released: bool,
    },
    /// A subscription exists under the current key.
    SubscriptionCurrent {
        /// Its delivery endpoint.
        endpoint: String,
    },
}

impl SubscriptionState {
    /// Whether a user-initiated subscribe is reachable from here.
    pub fn can_subscribe(&self) -> bool {
        matches!(
            self,
            Self::NoSubscription | Self::SubscriptionStale { released: true }
        )
    }

    /// Whether a user-initiated unsubscribe is reachable from here.
    pub fn can_unsubscribe(&self) -> bool {
        matches!(self, Self::SubscriptionCurrent { .. })
    }
}

/// Drives keep / create / tear down decisions for one page.
///
/// Holds the last fetched key and the last reached state. The subscription
/// handle itself is never stored: every operation asks the platform afresh.
pub struct ReconciliationEngine<F, P, R> {
    fetcher: F,
    platform: P,
    registrar: R,
    worker_script: String,
    key: RefCell<Option<PublicKey>>,
    state: RefCell<Option<SubscriptionState>>,
    in_flight: Cell<bool>,
}

impl<F, P, R> std::fmt::Debug for ReconciliationEngine<F, P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("worker_script", &self.worker_script)
            .field("key", &self.key.borrow())
            .field("state", &self.state.borrow())
            .field("in_flight", &self.in_flight.get())
            .finish_non_exhaustive()
    }
}

impl<F, P, R> ReconciliationEngine<F, P, R>
where
    F: KeyFetcher,
    P: PushPlatform,
    R: EndpointRegistrar,
{
    /// Create an engine that has not reconciled yet.
    pub fn new(fetcher: F, platform: P, registrar: R) -> Self {
        Self {
            fetcher,
            platform,
            registrar,
            worker_script: WORKER_SCRIPT.to_string(),
            key: RefCell::new(None),
            state: RefCell::new(None),
            in_flight: Cell::new(false),
        }
    }

    /// Override the worker script registered before subscribing.
    pub fn with_worker_script(mut self, script_url: impl Into<String>) -> Self {
        self.worker_script = script_url.into();
        self
    }

    /// Last reached state, `None` until a reconciliation succeeds.
    pub fn state(&self) -> Option<SubscriptionState> {
        self.state.borrow().clone()
    }

    /// Key fetched by the last reconciliation.
    pub fn public_key(&self) -> Option<PublicKey> {
        self.key.borrow().clone()
    }

    /// Whether an operation is pending.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Fetch the key, inspect the current subscription and act on it.
    ///
    /// A failed key fetch aborts before the platform is touched.
    pub async fn reconcile(&self) -> Result<SubscriptionState> {
        if self.in_flight.replace(true) {
            return Err(PushError::Busy);
        }
        let _flight = scopeguard::guard((), |()| self.in_flight.set(false));

        self.reconcile_once().await
    }

    /// Create a subscription under the current key and register its endpoint.
    pub async fn subscribe(&self) -> Result<SubscriptionState> {
        if self.in_flight.replace(true) {
            return Err(PushError::Busy);
        }
        let _flight = scopeguard::guard((), |()| self.in_flight.set(false));

        let from = self.state();
        if !from.as_ref().is_some_and(SubscriptionState::can_subscribe) {
            return Err(PushError::InvalidTransition {
                action: "subscribe",
                from,
            });
        }
        let key = self.public_key().ok_or(PushError::KeyUnavailable)?;

        if let Err(e) = self.platform.register_worker(&self.worker_script).await {
            log::error!("[PushSync] Registering worker {} failed: {e}", self.worker_script);
            return Err(e);
        }
        let subscription = match self.platform.subscribe(&key).await {
            Ok(subscription) => subscription,
            Err(e) => {
                log::error!("[PushSync] Subscribing failed: {e}");
                return Err(e);
            }
        };

        let endpoint = subscription.endpoint();
        log::info!("[PushSync] Subscribed, endpoint: {endpoint}");
        self.confirm_registration(&endpoint).await;

        Ok(self.enter(SubscriptionState::SubscriptionCurrent { endpoint }))
    }

    /// Release the current subscription, then reconcile from scratch.
    ///
    /// The server keeps its record of the released endpoint: no
    /// deregistration write exists.
    pub async fn unsubscribe(&self) -> Result<SubscriptionState> {
        if self.in_flight.replace(true) {
            return Err(PushError::Busy);
        }
        let _flight = scopeguard::guard((), |()| self.in_flight.set(false));

        let from = self.state();
        if !from.as_ref().is_some_and(SubscriptionState::can_unsubscribe) {
            return Err(PushError::InvalidTransition {
                action: "unsubscribe",
                from,
            });
        }

        match self.platform.current_subscription().await {
            Ok(Some(subscription)) => match subscription.unsubscribe().await {
                Ok(true) => log::info!("[PushSync] Unsubscribed"),
                Ok(false) => {
                    log::warn!("[PushSync] Platform declined to unsubscribe");
                    return Err(PushError::platform("unsubscribe", "declined by push manager"));
                }
                Err(e) => {
                    log::error!("[PushSync] Unsubscribing failed: {e}");
                    return Err(e);
                }
            },
            Ok(None) => log::warn!("[PushSync] Nothing to unsubscribe, subscription already gone"),
            Err(e) => {
                log::error!("[PushSync] Reading subscription failed: {e}");
                return Err(e);
            }
        }

        // The subscription is gone whatever the re-evaluation below reports.
        self.enter(SubscriptionState::NoSubscription);
        self.reconcile_once().await
    }

    async fn reconcile_once(&self) -> Result<SubscriptionState> {
        let key = match self.fetcher.fetch_key().await {
            Ok(key) => key,
            Err(e) => {
                log::error!("[PushSync] Fetching public key failed: {e}");
                self.key.replace(None);
                return Err(e);
            }
        };
        log::info!("[PushSync] Public key '{key}'");
        self.key.replace(Some(key.clone()));

        let inspection = match inspect(&self.platform).await {
            Ok(inspection) => inspection,
            Err(e) => {
                log::error!("[PushSync] Inspecting subscription failed: {e}");
                return Err(e);
            }
        };

        let state = match inspection {
            None => {
                log::info!("[PushSync] No subscription");
                SubscriptionState::NoSubscription
            }
            Some(found) if keys_match(found.key_material.as_deref(), &key) => {
                log::info!("[PushSync] Already subscribed with current key, endpoint: {}", found.endpoint);
                self.confirm_registration(&found.endpoint).await;
                SubscriptionState::SubscriptionCurrent {
                    endpoint: found.endpoint,
                }
            }
            Some(found) => self.release_stale(found, &key).await,
        };

        Ok(self.enter(state))
    }

    async fn release_stale(
        &self,
        found: Inspection<P::Subscription>,
        key: &PublicKey,
    ) -> SubscriptionState {
        log::info!(
            "[PushSync] Subscription key differs, current='{}' want='{key}'",
            found
                .key_material
                .as_deref()
                .map(url_safe_encoding)
                .unwrap_or_default()
        );

        let released = match found.subscription.unsubscribe().await {
            Ok(true) => {
                log::info!("[PushSync] Released stale subscription");
                true
            }
            Ok(false) => {
                log::warn!("[PushSync] Platform declined to release stale subscription");
                false
            }
            Err(e) => {
                log::error!("[PushSync] Releasing stale subscription failed: {e}");
                false
            }
        };

        SubscriptionState::SubscriptionStale { released }
    }

    async fn confirm_registration(&self, endpoint: &str) {
        match self.registrar.register(endpoint).await {
            Ok(()) => log::info!("[PushSync] Registered endpoint"),
            Err(e) => log::error!("[PushSync] Registering endpoint failed: {e}"),
        }
    }

    fn enter(&self, state: SubscriptionState) -> SubscriptionState {
        self.state.replace(Some(state.clone()));
        state
    }
}
