//! Audio Session Abstraction
//!
//! Surfaces the platform audio session: category activation, interruptions
//! (phone calls, alarms), and output-route changes (headphones unplugged).

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};
use serde::{Deserialize, Serialize};

/// One output device in an audio route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputRoute {
    Headphones,
    BuiltInSpeaker,
    Bluetooth,
    /// Any device not explicitly mapped.
    Other,
}

/// Events delivered by the platform audio session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AudioSessionEvent {
    /// Another audio source took over (e.g. an incoming call).
    InterruptionBegan,
    /// The interruption ended.
    ///
    /// `should_resume` carries the platform's hint on whether resuming
    /// playback is appropriate.
    InterruptionEnded { should_resume: bool },
    /// The output route changed.
    ///
    /// `previous_outputs` is the device set of the route that was active
    /// before the change; `old_device_unavailable` is true when the change
    /// was caused by that route disappearing (unplugged headphones,
    /// disconnected bluetooth device).
    RouteChanged {
        old_device_unavailable: bool,
        previous_outputs: Vec<OutputRoute>,
    },
}

/// Audio session host trait
///
/// # Platform Support
///
/// - **iOS**: AVAudioSession category/activation and its notifications
/// - **Android**: AudioManager focus and becoming-noisy broadcasts
/// - **Desktop/Web**: usually a no-op category with no interruptions
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioSessionHost: PlatformSendSync {
    /// Configure the session for playback and activate or deactivate it.
    async fn set_playback_category(&self, active: bool) -> Result<()>;

    /// Subscribe to interruption and route-change events.
    async fn subscribe_events(&self) -> Result<Box<dyn AudioSessionEventStream>>;
}

/// Stream of audio session events.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioSessionEventStream: PlatformSend {
    /// Get the next audio session event.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<AudioSessionEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_change_event_roundtrip() {
        let event = AudioSessionEvent::RouteChanged {
            old_device_unavailable: true,
            previous_outputs: vec![OutputRoute::Headphones, OutputRoute::Other],
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: AudioSessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
