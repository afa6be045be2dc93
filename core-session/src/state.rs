//! # Playback Session State Machine
//!
//! Pure, synchronous core of the session: [`SessionState`] holds the
//! authoritative view of what the engine should be doing, and
//! [`SessionState::apply`] folds one [`SessionEvent`] into it, returning the
//! [`Effect`]s the actor must execute. No I/O happens here; the same state
//! and the same event always produce the same next state and the same effect
//! list.
//!
//! ## Transition rules
//!
//! - Setting an item stops and detaches the previous one, resets every
//!   per-item field, loads the new resource, and (with auto-play) runs the
//!   play path.
//! - Play with no item does nothing. Play after the resource failed, or with
//!   a reload pending, rebuilds the resource exactly once before starting
//!   the transport. Every play acquires the background grant; every pause
//!   releases it.
//! - Pause stops the transport and detaches the resource, so the next play
//!   re-attaches.
//! - Seeks reject non-finite targets outright. Accepted seeks bump the
//!   request counter; only the completion matching the newest request clears
//!   `is_seeking` (last seek wins).
//! - Stall recovery arms on the buffering rising edge, and on the
//!   reachability rising edge observed while buffering. Armed recovery marks
//!   the resource for reload; if playback is supposed to be running it
//!   replays immediately, otherwise the reload waits for the next play.
//! - Interruptions pause; an interruption end resumes only when the platform
//!   says so. Route changes pause only when headphones went away.

use bridge_traits::engine::{EngineStatus, SeekRequestId, TimeRange};

use crate::config::SessionConfig;
use crate::events::{Effect, SessionEvent};
use crate::item::PlaybackItem;

/// Mutable state owned exclusively by the playback session.
#[derive(Debug, Clone)]
pub struct SessionState {
    config: SessionConfig,
    current_item: Option<PlaybackItem>,
    status: EngineStatus,
    is_playing: bool,
    is_seeking: bool,
    is_buffering: bool,
    is_reachable: bool,
    duration: f64,
    played_time: f64,
    loaded_ranges: Vec<TimeRange>,
    needs_reload: bool,
    last_seek: u64,
}

impl SessionState {
    /// Create the initial state.
    ///
    /// `reachable` seeds the connectivity flag so the first reported
    /// transition is a real edge rather than the startup value.
    pub fn new(config: SessionConfig, reachable: bool) -> Self {
        Self {
            config,
            current_item: None,
            status: EngineStatus::Unknown,
            is_playing: false,
            is_seeking: false,
            is_buffering: false,
            is_reachable: reachable,
            duration: 0.0,
            played_time: 0.0,
            loaded_ranges: Vec::new(),
            needs_reload: false,
            last_seek: 0,
        }
    }

    /// Apply one event, returning the effects to execute.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::ItemChanged { item } => self.on_item_changed(item),
            SessionEvent::PlayRequested => self.play_effects(),
            SessionEvent::PauseRequested => self.pause_effects(),
            SessionEvent::SeekRequested { seconds } => self.on_seek_requested(seconds),
            SessionEvent::SeekCompleted { request, .. } => {
                // Completions of superseded seeks are ignored: only the
                // newest request ends the seeking window.
                if request.0 == self.last_seek {
                    self.is_seeking = false;
                }
                Vec::new()
            }
            SessionEvent::EngineStatusChanged { status } => {
                self.status = status;
                Vec::new()
            }
            SessionEvent::DurationChanged { seconds } => {
                self.duration = seconds;
                Vec::new()
            }
            SessionEvent::PositionChanged { seconds } => {
                self.played_time = seconds;
                Vec::new()
            }
            SessionEvent::LoadedRangesChanged { ranges } => {
                self.loaded_ranges = ranges;
                Vec::new()
            }
            SessionEvent::BufferingChanged { buffering } => {
                let rising = buffering && !self.is_buffering;
                self.is_buffering = buffering;
                if rising {
                    self.stall_recovery()
                } else {
                    Vec::new()
                }
            }
            SessionEvent::ConnectivityChanged { reachable } => {
                let rising = reachable && !self.is_reachable;
                self.is_reachable = reachable;
                if rising && self.is_buffering {
                    self.stall_recovery()
                } else {
                    Vec::new()
                }
            }
            SessionEvent::EndOfItemReached => vec![Effect::NotifyEndOfItem],
            SessionEvent::InterruptionBegan => self.pause_effects(),
            SessionEvent::InterruptionEnded { should_resume } => {
                if should_resume {
                    self.play_effects()
                } else {
                    self.pause_effects()
                }
            }
            SessionEvent::RouteChanged {
                old_device_unavailable,
                had_headphones,
            } => {
                if old_device_unavailable && had_headphones {
                    self.pause_effects()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn on_item_changed(&mut self, item: PlaybackItem) -> Vec<Effect> {
        let mut effects = self.pause_effects();

        // Every per-item field returns to its default; the new resource's
        // signals repopulate them.
        self.status = EngineStatus::Unknown;
        self.is_seeking = false;
        self.is_buffering = false;
        self.duration = 0.0;
        self.played_time = 0.0;
        self.loaded_ranges.clear();
        self.needs_reload = false;
        self.current_item = Some(item.clone());

        effects.push(Effect::ActivateAudioSession);
        effects.push(Effect::LoadResource {
            item,
            reload: false,
        });
        if self.config.auto_play {
            effects.extend(self.play_effects());
        }
        effects
    }

    fn on_seek_requested(&mut self, seconds: f64) -> Vec<Effect> {
        // NaN and infinite targets are dropped outright; neither is a
        // position the transport can reach.
        if !seconds.is_finite() || self.current_item.is_none() {
            return Vec::new();
        }

        self.is_seeking = true;
        let mut effects = Vec::new();
        if self.config.auto_play_on_seek {
            effects.extend(self.play_effects());
        }
        self.last_seek += 1;
        effects.push(Effect::SeekTransport {
            seconds,
            request: SeekRequestId(self.last_seek),
        });
        effects
    }

    /// Effects for a play intent. No item means no effects.
    fn play_effects(&mut self) -> Vec<Effect> {
        let Some(item) = self.current_item.clone() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if self.status == EngineStatus::Failed || self.needs_reload {
            // A failed resource and a pending reload collapse into one
            // rebuild; the transport starts on the fresh resource.
            self.needs_reload = false;
            self.status = EngineStatus::Unknown;
            effects.push(Effect::LoadResource { item, reload: true });
        } else {
            effects.push(Effect::AttachResource);
        }
        effects.push(Effect::StartTransport);
        effects.push(Effect::BeginBackgroundGrant);
        self.is_playing = true;
        effects
    }

    /// Effects for a pause intent. Always stops, detaches, and releases the
    /// background grant.
    fn pause_effects(&mut self) -> Vec<Effect> {
        self.is_playing = false;
        vec![
            Effect::StopTransport,
            Effect::DetachResource,
            Effect::EndBackgroundGrant,
        ]
    }

    fn stall_recovery(&mut self) -> Vec<Effect> {
        self.needs_reload = true;
        if self.is_playing {
            self.play_effects()
        } else {
            Vec::new()
        }
    }

    /// The most recently set item.
    pub fn current_item(&self) -> Option<&PlaybackItem> {
        self.current_item.as_ref()
    }

    /// Engine readiness for the current resource.
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Last-known trying-to-play intent.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// True between a seek request and its completion.
    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    /// Engine's likely-to-stall estimate.
    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    /// Last observed reachability.
    pub fn is_reachable(&self) -> bool {
        self.is_reachable
    }

    /// Media duration in seconds (0 until the engine reports it).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Transport position in seconds.
    pub fn played_time(&self) -> f64 {
        self.played_time
    }

    /// Buffered time ranges.
    pub fn loaded_ranges(&self) -> &[TimeRange] {
        &self.loaded_ranges
    }
}
