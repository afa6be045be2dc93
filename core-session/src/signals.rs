//! # Derived Session Signals
//!
//! Push-style, read-only outputs of the playback session. Value signals ride
//! on `tokio::sync::watch` behind a compare-before-send wrapper, so
//! subscribers are only woken when a value actually changes — pushing the
//! same value twice notifies once. Momentary facts (end of item, queue
//! boundaries) are broadcast pulses instead.

use bridge_traits::engine::{EngineStatus, TimeRange};
use tokio::sync::{broadcast, watch};

use crate::item::PlaybackItem;

/// A deduplicated observable value.
///
/// `publish` compares against the current value and forwards only actual
/// changes to watchers; `watch` hands out an independent receiver seeded
/// with the current value.
#[derive(Debug)]
pub struct Signal<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Subscribe to changes. The receiver starts at the current value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Set the value, notifying watchers only if it differs.
    pub(crate) fn publish(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

/// The full set of observable session outputs.
///
/// Handed out by the session as a shared, read-only surface; only the
/// session actor publishes into it.
#[derive(Debug)]
pub struct SessionSignals {
    current_item: Signal<Option<PlaybackItem>>,
    status: Signal<EngineStatus>,
    is_playing: Signal<bool>,
    is_seeking: Signal<bool>,
    is_buffering: Signal<bool>,
    duration: Signal<f64>,
    played_time: Signal<f64>,
    loaded_ranges: Signal<Vec<TimeRange>>,
    did_reach_end: broadcast::Sender<()>,
}

impl SessionSignals {
    pub(crate) fn new(pulse_capacity: usize) -> Self {
        let (did_reach_end, _) = broadcast::channel(pulse_capacity.max(1));
        Self {
            current_item: Signal::new(None),
            status: Signal::new(EngineStatus::Unknown),
            is_playing: Signal::new(false),
            is_seeking: Signal::new(false),
            is_buffering: Signal::new(false),
            duration: Signal::new(0.0),
            played_time: Signal::new(0.0),
            loaded_ranges: Signal::new(Vec::new()),
            did_reach_end,
        }
    }

    /// The most recently set item.
    pub fn current_item(&self) -> &Signal<Option<PlaybackItem>> {
        &self.current_item
    }

    /// Engine readiness for the current item's resource.
    pub fn status(&self) -> &Signal<EngineStatus> {
        &self.status
    }

    /// Trying-to-play intent.
    pub fn is_playing(&self) -> &Signal<bool> {
        &self.is_playing
    }

    /// True between a seek request and its completion.
    pub fn is_seeking(&self) -> &Signal<bool> {
        &self.is_seeking
    }

    /// Engine's likely-to-stall estimate.
    pub fn is_buffering(&self) -> &Signal<bool> {
        &self.is_buffering
    }

    /// Media duration in seconds.
    pub fn duration(&self) -> &Signal<f64> {
        &self.duration
    }

    /// Transport position in seconds.
    pub fn played_time(&self) -> &Signal<f64> {
        &self.played_time
    }

    /// Buffered time ranges.
    pub fn loaded_ranges(&self) -> &Signal<Vec<TimeRange>> {
        &self.loaded_ranges
    }

    /// Fraction of the item already played, 0 when the duration is unknown.
    pub fn progress(&self) -> f64 {
        let duration = self.duration.get();
        if duration == 0.0 {
            0.0
        } else {
            self.played_time.get() / duration
        }
    }

    /// Subscribe to the end-of-item pulse.
    pub fn subscribe_end_of_item(&self) -> broadcast::Receiver<()> {
        self.did_reach_end.subscribe()
    }

    pub(crate) fn notify_end_of_item(&self) {
        // No receivers is fine; the pulse is informational.
        let _ = self.did_reach_end.send(());
    }
}
