//! Media engine bridge trait and supporting types.
//!
//! The engine is the platform's opaque playback machinery (an `AVPlayer`, a
//! GStreamer pipeline, an HTML media element). The session core drives it
//! exclusively through this contract: it creates and replaces *resources*
//! (one playable instance of a media URL), issues transport commands, and
//! consumes a single ordered stream of engine signals. Decoding, rendering,
//! DRM and the network transport of media bytes all live behind this trait.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to one playable media instance maintained by the engine.
///
/// A resource stays valid until replaced away and released by the host;
/// detaching it (`replace_resource(None)`) does not destroy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier correlating a seek request with its completion signal.
///
/// The session allocates these monotonically; the engine echoes the value
/// back in [`EngineEvent::SeekCompleted`] so that completions of superseded
/// seeks can be told apart from the most recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeekRequestId(pub u64);

/// Readiness of the engine's current resource.
///
/// This reflects the underlying media resource, not the session's
/// play/pause intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineStatus {
    /// Resource readiness has not been determined yet.
    Unknown,
    /// The resource can be played.
    ReadyToPlay,
    /// The resource cannot be played (unresolvable URL, decode error).
    Failed,
}

/// A half-open `[start, end)` interval of buffered media time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Asynchronous signals delivered by the engine.
///
/// Every event names the resource it belongs to; consumers observing a newer
/// resource must drop events tagged with a superseded one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    /// Readiness of the resource changed.
    StatusChanged {
        resource: ResourceId,
        status: EngineStatus,
    },
    /// Total media duration became known or changed, in seconds.
    DurationChanged { resource: ResourceId, seconds: f64 },
    /// The engine's estimate of whether playback is likely to stall flipped.
    ///
    /// `buffering == true` means playback is at risk of running out of
    /// decoded data.
    BufferingChanged { resource: ResourceId, buffering: bool },
    /// The set of buffered time ranges changed.
    LoadedRangesChanged {
        resource: ResourceId,
        ranges: Vec<TimeRange>,
    },
    /// Periodic transport position update, in seconds.
    PositionChanged { resource: ResourceId, seconds: f64 },
    /// A previously issued seek finished.
    ///
    /// `finished` is false when the engine abandoned the seek (for example
    /// because a newer seek superseded it).
    SeekCompleted {
        resource: ResourceId,
        request: SeekRequestId,
        finished: bool,
    },
    /// The resource played to its end.
    DidReachEnd { resource: ResourceId },
}

impl EngineEvent {
    /// The resource this event belongs to.
    pub fn resource(&self) -> ResourceId {
        match self {
            EngineEvent::StatusChanged { resource, .. }
            | EngineEvent::DurationChanged { resource, .. }
            | EngineEvent::BufferingChanged { resource, .. }
            | EngineEvent::LoadedRangesChanged { resource, .. }
            | EngineEvent::PositionChanged { resource, .. }
            | EngineEvent::SeekCompleted { resource, .. }
            | EngineEvent::DidReachEnd { resource } => *resource,
        }
    }
}

/// Trait for platform media engines that the session core drives.
///
/// Implementations own the actual playback machinery. All operations are
/// expected to be fast and non-blocking; long-running work (resource
/// resolution, seeking) completes through [`EngineEvent`]s instead of
/// blocking the caller.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaEngine: PlatformSendSync {
    /// Create a resource for the given media URL.
    ///
    /// The resource is not attached to the transport yet; readiness is
    /// reported asynchronously through [`EngineEvent::StatusChanged`].
    async fn load_resource(&self, url: &str) -> Result<ResourceId>;

    /// Attach a resource to the transport, or detach with `None`.
    ///
    /// Engines that free resources asynchronously must tolerate a detach
    /// immediately followed by an attach of a different resource; the
    /// session uses that two-step when rebuilding after a failure.
    async fn replace_resource(&self, resource: Option<ResourceId>) -> Result<()>;

    /// Start or resume the transport.
    async fn play(&self) -> Result<()>;

    /// Stop the transport without resetting position.
    async fn pause(&self) -> Result<()>;

    /// Seek the attached resource to an absolute position in seconds.
    ///
    /// Completion is reported through [`EngineEvent::SeekCompleted`]
    /// carrying the same `request` id.
    async fn seek(&self, seconds: f64, request: SeekRequestId) -> Result<()>;

    /// Subscribe to the engine's signal stream.
    ///
    /// Events are delivered in the order the engine observed them.
    async fn subscribe_events(&self) -> Result<Box<dyn EngineEventStream>>;
}

/// Ordered stream of engine signals.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait EngineEventStream: PlatformSend {
    /// Get the next engine event.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<EngineEvent>;
}
