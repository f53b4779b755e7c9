//! Error taxonomy for the reconciliation flow.

use thiserror::Error;

use crate::engine::SubscriptionState;

/// Failures surfaced by the reconciliation core and its collaborators.
///
/// A stale subscription is not an error: it is reported as
/// [`SubscriptionState::SubscriptionStale`] and handled locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    /// A fetch returned a non-success status or was rejected outright.
    #[error("network request failed: {0}")]
    Network(String),
    /// Worker readiness, worker registration or a push-manager call rejected.
    #[error("push platform call failed: {0}")]
    Platform(String),
    /// The public key could not be decoded into raw key bytes.
    #[error("invalid public key: {0}")]
    InvalidKey(String),
    /// Registration was attempted with an empty endpoint.
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
    /// Another reconciliation step is still pending.
    #[error("a push subscription operation is already in flight")]
    Busy,
    /// A user action was requested from a state that cannot reach it.
    #[error("cannot {action} from state {from:?}")]
    InvalidTransition {
        /// The requested action.
        action: &'static str,
        /// The state the engine was in.
        from: Option<SubscriptionState>,
    },
    /// A user action was requested before any public key was fetched.
    #[error("no public key has been fetched yet")]
    KeyUnavailable,
}

impl PushError {
    /// Shorthand for a [`PushError::Network`] with a context prefix.
    pub fn network(context: &str, detail: impl std::fmt::Display) -> Self {
        Self::Network(format!("{context}: {detail}"))
    }

    /// Shorthand for a [`PushError::Platform`] with a context prefix.
    pub fn platform(context: &str, detail: impl std::fmt::Display) -> Self {
        Self::Platform(format!("{context}: {detail}"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PushError>;
