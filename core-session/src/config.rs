//! # Session Configuration

use serde::{Deserialize, Serialize};

/// Playback session configuration.
///
/// Controls the automatic-play policies and the channel capacities of the
/// session actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Start playing as soon as an item is set.
    ///
    /// Default: true.
    #[serde(default = "default_auto_play")]
    pub auto_play: bool,

    /// A seek while paused first runs the play path, then seeks.
    ///
    /// Default: true.
    #[serde(default = "default_auto_play_on_seek")]
    pub auto_play_on_seek: bool,

    /// Capacity of the session's command inbox.
    ///
    /// Callers sending commands faster than the actor drains them will wait
    /// once this many are queued.
    ///
    /// Default: 32.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Buffer size of the pulse channels (end-of-item, reached-end,
    /// reached-start).
    ///
    /// Subscribers that fall behind by more than this many pulses observe a
    /// lag error instead of the missed pulses.
    ///
    /// Default: 16.
    #[serde(default = "default_pulse_capacity")]
    pub pulse_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_play: default_auto_play(),
            auto_play_on_seek: default_auto_play_on_seek(),
            command_capacity: default_command_capacity(),
            pulse_capacity: default_pulse_capacity(),
        }
    }
}

impl SessionConfig {
    /// Configuration where nothing plays until the caller asks.
    ///
    /// Setting an item only loads it, and seeks do not start the transport.
    pub fn manual() -> Self {
        Self {
            auto_play: false,
            auto_play_on_seek: false,
            ..Default::default()
        }
    }
}

fn default_auto_play() -> bool {
    true
}

fn default_auto_play_on_seek() -> bool {
    true
}

fn default_command_capacity() -> usize {
    32
}

fn default_pulse_capacity() -> usize {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SessionConfig::default();
        assert!(config.auto_play);
        assert!(config.auto_play_on_seek);
        assert_eq!(config.command_capacity, 32);
        assert_eq!(config.pulse_capacity, 16);
    }

    #[test]
    fn manual_preset_disables_auto_play() {
        let config = SessionConfig::manual();
        assert!(!config.auto_play);
        assert!(!config.auto_play_on_seek);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"auto_play": false}"#).unwrap();
        assert!(!config.auto_play);
        assert_eq!(config.command_capacity, 32);
    }
}
