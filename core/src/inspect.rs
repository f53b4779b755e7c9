//! Reads the existing subscription and pulls out what the engine compares.

use crate::error::Result;
use crate::platform::{PushPlatform, Subscription};

/// Snapshot of an existing subscription, valid for the current operation only.
#[derive(Debug)]
pub struct Inspection<S> {
    /// The live handle, needed if the engine decides to release it.
    pub subscription: S,
    /// Delivery endpoint.
    pub endpoint: String,
    /// Key the subscription was created with.
    pub key_material: Option<Vec<u8>>,
}

/// Wait for worker readiness and read the current subscription, if any.
///
/// Suspends until the platform reports readiness or fails. No side effects.
pub async fn inspect<P: PushPlatform>(platform: &P) -> Result<Option<Inspection<P::Subscription>>> {
    let Some(subscription) = platform.current_subscription().await? else {
        return Ok(None);
    };

    Ok(Some(Inspection {
        endpoint: subscription.endpoint(),
        key_material: subscription.key_material(),
        subscription,
    }))
}
