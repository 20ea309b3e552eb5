//! Configuration sections, one per TOML table.

use serde::{Deserialize, Serialize};

/// Sequence playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Tempo for sequences that don't set their own.
    /// Default: 144
    #[serde(default = "PlaybackConfig::default_tempo_bpm")]
    pub tempo_bpm: f64,

    /// How far ahead of the channel clock notes may be sent, in seconds.
    /// Default: 1.0
    #[serde(default = "PlaybackConfig::default_lookahead_secs")]
    pub lookahead_secs: f64,

    /// Slack subtracted from the lookahead, in seconds.
    /// Default: 0.1
    #[serde(default = "PlaybackConfig::default_processing_margin_secs")]
    pub processing_margin_secs: f64,
}

impl PlaybackConfig {
    fn default_tempo_bpm() -> f64 {
        144.0
    }

    fn default_lookahead_secs() -> f64 {
        1.0
    }

    fn default_processing_margin_secs() -> f64 {
        0.1
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: Self::default_tempo_bpm(),
            lookahead_secs: Self::default_lookahead_secs(),
            processing_margin_secs: Self::default_processing_margin_secs(),
        }
    }
}

/// Strumming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuitarConfig {
    /// Seconds between strings in a strum.
    /// Default: 0.0625
    #[serde(default = "GuitarConfig::default_time_per_string")]
    pub time_per_string: f64,

    /// Pluck strength, 0 to 1.
    /// Default: 0.8
    #[serde(default = "GuitarConfig::default_strength")]
    pub strength: f64,

    /// Seconds between chord changes.
    /// Default: 1.0
    #[serde(default = "GuitarConfig::default_chord_spacing_secs")]
    pub chord_spacing_secs: f64,
}

impl GuitarConfig {
    fn default_time_per_string() -> f64 {
        0.0625
    }

    fn default_strength() -> f64 {
        0.8
    }

    fn default_chord_spacing_secs() -> f64 {
        1.0
    }
}

impl Default for GuitarConfig {
    fn default() -> Self {
        Self {
            time_per_string: Self::default_time_per_string(),
            strength: Self::default_strength(),
            chord_spacing_secs: Self::default_chord_spacing_secs(),
        }
    }
}

/// MIDI output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Substring of the output port name; empty picks the first port.
    #[serde(default)]
    pub port: String,

    /// MIDI channel, 0 to 15.
    #[serde(default)]
    pub channel: u8,
}

/// Logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
