//! Remote Transport Commands
//!
//! External play/pause/next/previous command sources: lock-screen controls,
//! headset buttons, system media keys. They feed the same intents as the
//! host UI's own controls.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};
use serde::{Deserialize, Serialize};

/// A transport command issued outside the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteCommand {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
}

/// Remote command source trait
///
/// # Platform Support
///
/// - **iOS**: MPRemoteCommandCenter targets
/// - **Android**: MediaSession callbacks
/// - **Desktop**: MPRIS / SMTC
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait RemoteCommandSource: PlatformSendSync {
    /// Subscribe to remote transport commands.
    async fn subscribe_commands(&self) -> Result<Box<dyn RemoteCommandStream>>;
}

/// Stream of remote transport commands.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait RemoteCommandStream: PlatformSend {
    /// Get the next remote command.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<RemoteCommand>;
}
