//! Background Execution Grants
//!
//! Keeps playback alive after the app loses the foreground.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to one outstanding background-execution grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId(Uuid);

impl GrantId {
    /// Generate a new grant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Background execution host trait
///
/// Abstracts the platform's "keep running in the background" facility:
/// - **iOS**: `beginBackgroundTask` / `endBackgroundTask`
/// - **Android**: foreground service / wake lock
/// - **Desktop**: typically a no-op
///
/// The session core holds at most one grant at a time (single slot, not a
/// counter): requesting a new grant while one is outstanding begins the new
/// grant first and then releases the prior one, so coverage never lapses.
/// Hosts only need to honor individual begin/end pairs.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait BackgroundExecutionHost: PlatformSendSync {
    /// Request a background-execution grant.
    async fn begin_grant(&self) -> Result<GrantId>;

    /// Release a previously requested grant.
    async fn end_grant(&self, grant: GrantId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_id_is_unique() {
        let a = GrantId::new();
        let b = GrantId::new();
        assert_ne!(a, b);
    }
}
