//! # Session Events and Effects
//!
//! The playback session is an event-driven state machine: every input —
//! caller intent, engine callback, connectivity transition, platform
//! audio-session notification — is expressed as one [`SessionEvent`] and
//! consumed by [`SessionState::apply`](crate::state::SessionState::apply) in
//! strict arrival order. Each application returns the list of [`Effect`]s the
//! actor must run against the bridge collaborators.
//!
//! Keeping the union explicit (instead of a mesh of merged push-streams)
//! makes every reconciliation rule a plain `match` arm, and makes the whole
//! machine testable without an engine.

use bridge_traits::engine::{EngineStatus, SeekRequestId, TimeRange};
use serde::{Deserialize, Serialize};

use crate::item::PlaybackItem;

/// One input to the playback state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A new item replaces the current one.
    ItemChanged { item: PlaybackItem },
    /// Caller or remote control asked to play.
    PlayRequested,
    /// Caller or remote control asked to pause.
    PauseRequested,
    /// Caller asked to seek to an absolute position in seconds.
    SeekRequested { seconds: f64 },
    /// Engine readiness for the current resource changed.
    EngineStatusChanged { status: EngineStatus },
    /// Engine reported a new media duration, in seconds.
    DurationChanged { seconds: f64 },
    /// Engine's likely-to-stall estimate flipped.
    BufferingChanged { buffering: bool },
    /// Engine's buffered ranges changed.
    LoadedRangesChanged { ranges: Vec<TimeRange> },
    /// Periodic transport position update, in seconds.
    PositionChanged { seconds: f64 },
    /// An engine seek finished.
    SeekCompleted {
        request: SeekRequestId,
        finished: bool,
    },
    /// The current item played to its end.
    EndOfItemReached,
    /// Network reachability flipped.
    ConnectivityChanged { reachable: bool },
    /// Another audio source interrupted playback.
    InterruptionBegan,
    /// The interruption ended, with the platform's resume hint.
    InterruptionEnded { should_resume: bool },
    /// The audio output route changed.
    ///
    /// `had_headphones` is true when the previous route's device set
    /// included headphones.
    RouteChanged {
        old_device_unavailable: bool,
        had_headphones: bool,
    },
}

/// One side effect a state transition asks the session actor to perform.
///
/// Effects are executed in list order, after the transition has already
/// updated the state. They are descriptions, not closures: the actor owns
/// every engine resource handle and every platform grant, so the state
/// machine never touches a collaborator directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Stop the engine transport.
    StopTransport,
    /// Detach the engine's attached resource (`replace_resource(None)`).
    ///
    /// The loaded resource object survives detachment; a later
    /// [`Effect::AttachResource`] puts it back.
    DetachResource,
    /// Create a fresh engine resource for `item` and attach it.
    ///
    /// When `reload` is set the actor detaches first and only then attaches
    /// the replacement; engines that free resources asynchronously need the
    /// two-step so the transport never runs on a half-torn-down resource.
    LoadResource { item: PlaybackItem, reload: bool },
    /// Re-attach the current loaded resource to the transport.
    AttachResource,
    /// Start the engine transport.
    StartTransport,
    /// Issue an engine seek carrying the request id to correlate completion.
    SeekTransport {
        seconds: f64,
        request: SeekRequestId,
    },
    /// Ask the platform to activate the playback audio-session category.
    ActivateAudioSession,
    /// Acquire the background-execution grant (single slot).
    BeginBackgroundGrant,
    /// Release the background-execution grant.
    EndBackgroundGrant,
    /// Publish the end-of-item pulse to subscribers.
    NotifyEndOfItem,
}
