//! Configuration loading for strum.
//!
//! # Usage
//!
//! ```rust,no_run
//! use strumconf::StrumConfig;
//!
//! let config = StrumConfig::load().expect("Failed to load config");
//! println!("tempo: {} bpm", config.playback.tempo_bpm);
//! println!("strum spacing: {}s", config.guitar.time_per_string);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins, key by key):
//! 1. `/etc/strum/config.toml` (system)
//! 2. `~/.config/strum/config.toml` (user)
//! 3. `./strum.toml` (local override, or a path given on the command line)
//! 4. Environment variables (`STRUM_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [playback]
//! tempo_bpm = 144
//! lookahead_secs = 1.0
//! processing_margin_secs = 0.1
//!
//! [guitar]
//! time_per_string = 0.0625
//! strength = 0.8
//! chord_spacing_secs = 1.0
//!
//! [midi]
//! port = "FluidSynth"
//! channel = 0
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{GuitarConfig, MidiConfig, PlaybackConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete strum configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrumConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub guitar: GuitarConfig,

    #[serde(default)]
    pub midi: MidiConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl StrumConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/strum/config.toml`
    /// 3. `~/.config/strum/config.toml`
    /// 4. `./strum.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with `config_path` in place of `./strum.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let files = loader::discover_config_files_with_override(config_path);
        Self::load_layers(&files, |key| std::env::var(key).ok())
    }

    /// Apply `files` in order over the defaults, then the variables that
    /// `env` resolves.
    pub fn load_layers<F>(files: &[PathBuf], env: F) -> Result<(Self, ConfigSources), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sources = ConfigSources::default();
        let mut config = StrumConfig::default();

        for path in files {
            loader::apply_file(&mut config, path)?;
            sources.files.push(path.clone());
        }

        loader::apply_env_overrides(&mut config, &mut sources, env);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# strum configuration\n\n");

        output.push_str("[playback]\n");
        output.push_str(&format!("tempo_bpm = {:?}\n", self.playback.tempo_bpm));
        output.push_str(&format!(
            "lookahead_secs = {:?}\n",
            self.playback.lookahead_secs
        ));
        output.push_str(&format!(
            "processing_margin_secs = {:?}\n",
            self.playback.processing_margin_secs
        ));

        output.push_str("\n[guitar]\n");
        output.push_str(&format!(
            "time_per_string = {:?}\n",
            self.guitar.time_per_string
        ));
        output.push_str(&format!("strength = {:?}\n", self.guitar.strength));
        output.push_str(&format!(
            "chord_spacing_secs = {:?}\n",
            self.guitar.chord_spacing_secs
        ));

        output.push_str("\n[midi]\n");
        output.push_str(&format!("port = {:?}\n", self.midi.port));
        output.push_str(&format!("channel = {}\n", self.midi.channel));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = {:?}\n", self.telemetry.log_level));

        output
    }
}
