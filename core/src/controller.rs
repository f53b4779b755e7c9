//! Binds engine outcomes to a single interactive control.
//!
//! The controller owns nothing global: the page constructs it, hands it a
//! [`ControlView`], and routes the control's clicks to [`Controller::click`].

use crate::auth::AuthGate;
use crate::engine::{ReconciliationEngine, SubscriptionState};
use crate::error::Result;
use crate::platform::{EndpointRegistrar, KeyFetcher, PushPlatform};

/// What the single control currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Create a subscription.
    Subscribe,
    /// Release the current subscription.
    Unsubscribe,
    /// Send the user to the login flow.
    Login,
    /// An operation is pending.
    Pending,
    /// Nothing can be offered (no key, or a stale subscription stuck in place).
    Unavailable,
}

impl Affordance {
    /// Text shown on the control.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscribe => "Subscribe",
            Self::Unsubscribe => "Unsubscribe",
            Self::Login => "Login",
            Self::Pending => "Working…",
            Self::Unavailable => "Unavailable",
        }
    }

    /// Whether clicking the control does anything.
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Subscribe | Self::Unsubscribe | Self::Login)
    }
}

/// The page surface the controller drives.
pub trait ControlView {
    /// Show `affordance` on the control.
    fn render(&self, affordance: Affordance);

    /// Navigate the page to `path`.
    fn redirect(&self, path: &str);
}

/// Engine plus view plus auth gate for one page.
#[derive(Debug)]
pub struct Controller<F, P, R, V> {
    engine: ReconciliationEngine<F, P, R>,
    view: V,
    gate: AuthGate,
    login_path: String,
}

impl<F, P, R, V> Controller<F, P, R, V>
where
    F: KeyFetcher,
    P: PushPlatform,
    R: EndpointRegistrar,
    V: ControlView,
{
    /// Assemble a controller. Nothing runs until [`Controller::start`].
    pub fn new(
        engine: ReconciliationEngine<F, P, R>,
        view: V,
        gate: AuthGate,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            view,
            gate,
            login_path: login_path.into(),
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &ReconciliationEngine<F, P, R> {
        &self.engine
    }

    /// What the control should offer right now.
    pub fn affordance(&self) -> Affordance {
        if self.engine.is_in_flight() {
            return Affordance::Pending;
        }
        match self.engine.state() {
            Some(state) if state.can_unsubscribe() => Affordance::Unsubscribe,
            Some(state) if state.can_subscribe() => {
                if self.gate.allows_subscribe() {
                    Affordance::Subscribe
                } else {
                    Affordance::Login
                }
            }
            _ => Affordance::Unavailable,
        }
    }

    /// Run the page-load reconciliation and render the result.
    pub async fn start(&self) -> Result<SubscriptionState> {
        self.view.render(Affordance::Pending);
        let outcome = self.engine.reconcile().await;
        self.view.render(self.affordance());
        outcome
    }

    /// Handle one activation of the control.
    pub async fn click(&self) -> Result<()> {
        let outcome = match self.affordance() {
            Affordance::Login => {
                log::info!("[PushSync] Not logged in, redirecting to {}", self.login_path);
                self.view.redirect(&self.login_path);
                return Ok(());
            }
            Affordance::Subscribe => {
                self.view.render(Affordance::Pending);
                self.engine.subscribe().await.map(drop)
            }
            Affordance::Unsubscribe => {
                self.view.render(Affordance::Pending);
                self.engine.unsubscribe().await.map(drop)
            }
            Affordance::Pending | Affordance::Unavailable => {
                log::debug!("[PushSync] Ignoring click, control is inactive");
                return Ok(());
            }
        };
        self.view.render(self.affordance());
        outcome
    }
}
