//! Network Reachability Abstraction
//!
//! Provides the connectivity signal the session core uses to recover from
//! stalled playback.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};

/// Connectivity monitor trait
///
/// Reports whether the network is reachable and emits a transition whenever
/// that changes. The session core uses the unreachable→reachable edge,
/// observed while playback is buffering, to rebuild the engine resource.
///
/// # Platform Support
///
/// - **Desktop**: System network APIs (NetworkManager, SystemConfiguration, Windows Network List Manager)
/// - **iOS**: Network framework, Reachability
/// - **Android**: ConnectivityManager
/// - **Web**: Navigator.onLine (limited)
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ConnectivityMonitor: PlatformSendSync {
    /// Check if currently connected to any network.
    async fn is_reachable(&self) -> bool;

    /// Subscribe to reachability changes.
    ///
    /// Implementations must deduplicate: after the initial value, the stream
    /// emits only on actual transitions.
    async fn subscribe_changes(&self) -> Result<Box<dyn ReachabilityStream>>;
}

/// Stream of reachability transitions.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ReachabilityStream: PlatformSend {
    /// Get the next reachability value.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<bool>;
}
