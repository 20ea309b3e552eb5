//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, StrumConfig};
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/strum/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("strum/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    // Local override (current directory)
    let local = PathBuf::from("strum.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and lay its keys over `config`.
pub fn apply_file(config: &mut StrumConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Lay the keys present in `contents` over `config`. Missing keys keep
/// their current value; keys of the wrong type are an error.
pub fn apply_toml(config: &mut StrumConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let fields = Fields { path };

    if let Some(playback) = fields.section(&table, "playback")? {
        if let Some(v) = fields.float(playback, "playback.tempo_bpm")? {
            config.playback.tempo_bpm = v;
        }
        if let Some(v) = fields.float(playback, "playback.lookahead_secs")? {
            config.playback.lookahead_secs = v;
        }
        if let Some(v) = fields.float(playback, "playback.processing_margin_secs")? {
            config.playback.processing_margin_secs = v;
        }
    }

    if let Some(guitar) = fields.section(&table, "guitar")? {
        if let Some(v) = fields.float(guitar, "guitar.time_per_string")? {
            config.guitar.time_per_string = v;
        }
        if let Some(v) = fields.float(guitar, "guitar.strength")? {
            config.guitar.strength = v;
        }
        if let Some(v) = fields.float(guitar, "guitar.chord_spacing_secs")? {
            config.guitar.chord_spacing_secs = v;
        }
    }

    if let Some(midi) = fields.section(&table, "midi")? {
        if let Some(v) = fields.string(midi, "midi.port")? {
            config.midi.port = v;
        }
        if let Some(v) = fields.channel(midi, "midi.channel")? {
            config.midi.channel = v;
        }
    }

    if let Some(telemetry) = fields.section(&table, "telemetry")? {
        if let Some(v) = fields.string(telemetry, "telemetry.log_level")? {
            config.telemetry.log_level = v;
        }
    }

    Ok(())
}

/// Typed access to TOML values, reporting mistakes against one file.
struct Fields<'a> {
    path: &'a Path,
}

impl Fields<'_> {
    fn error(&self, key: &str, expected: &str) -> ConfigError {
        ConfigError::Parse {
            path: self.path.to_path_buf(),
            message: format!("{key} must be {expected}"),
        }
    }

    fn section<'t>(
        &self,
        table: &'t toml::Table,
        name: &str,
    ) -> Result<Option<&'t toml::Table>, ConfigError> {
        match table.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_table()
                .map(Some)
                .ok_or_else(|| self.error(name, "a table")),
        }
    }

    fn value<'t>(table: &'t toml::Table, dotted: &str) -> Option<&'t toml::Value> {
        let key = dotted.rsplit('.').next().unwrap_or(dotted);
        table.get(key)
    }

    /// Floats, with integers accepted (`tempo_bpm = 120`).
    fn float(&self, table: &toml::Table, dotted: &str) -> Result<Option<f64>, ConfigError> {
        match Self::value(table, dotted) {
            None => Ok(None),
            Some(toml::Value::Float(v)) => Ok(Some(*v)),
            Some(toml::Value::Integer(v)) => Ok(Some(*v as f64)),
            Some(_) => Err(self.error(dotted, "a number")),
        }
    }

    fn string(&self, table: &toml::Table, dotted: &str) -> Result<Option<String>, ConfigError> {
        match Self::value(table, dotted) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.error(dotted, "a string")),
        }
    }

    fn channel(&self, table: &toml::Table, dotted: &str) -> Result<Option<u8>, ConfigError> {
        match Self::value(table, dotted) {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .and_then(|v| u8::try_from(v).ok())
                .filter(|v| *v < 16)
                .map(Some)
                .ok_or_else(|| self.error(dotted, "an integer from 0 to 15")),
        }
    }
}

/// Apply environment variable overrides to config.
///
/// `env` looks a variable up; pass `|k| std::env::var(k).ok()` for the real
/// environment. Values that don't parse are skipped.
pub fn apply_env_overrides<F>(config: &mut StrumConfig, sources: &mut ConfigSources, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let mut float = |key: &str, slot: &mut f64| {
        if let Some(v) = env(key).and_then(|v| v.trim().parse().ok()) {
            *slot = v;
            sources.env_overrides.push(key.to_string());
        }
    };

    // Playback
    float("STRUM_TEMPO", &mut config.playback.tempo_bpm);
    float("STRUM_LOOKAHEAD_SECS", &mut config.playback.lookahead_secs);
    float(
        "STRUM_PROCESSING_MARGIN_SECS",
        &mut config.playback.processing_margin_secs,
    );

    // Guitar
    float("STRUM_TIME_PER_STRING", &mut config.guitar.time_per_string);
    float("STRUM_STRENGTH", &mut config.guitar.strength);

    // MIDI
    if let Some(v) = env("STRUM_MIDI_PORT") {
        config.midi.port = v;
        sources.env_overrides.push("STRUM_MIDI_PORT".to_string());
    }
    if let Some(ch) = env("STRUM_MIDI_CHANNEL")
        .and_then(|v| v.trim().parse::<u8>().ok())
        .filter(|ch| *ch < 16)
    {
        config.midi.channel = ch;
        sources.env_overrides.push("STRUM_MIDI_CHANNEL".to_string());
    }

    // Telemetry
    if let Some(v) = env("STRUM_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("STRUM_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = env("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn parse(toml: &str) -> Result<StrumConfig, ConfigError> {
        let mut config = StrumConfig::default();
        apply_toml(&mut config, toml, Path::new("test.toml"))?;
        Ok(config)
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse(
            r#"
[playback]
tempo_bpm = 120
"#,
        )
        .unwrap();
        assert_eq!(config.playback.tempo_bpm, 120.0);
        // Other values should be defaults
        assert_eq!(config.playback.lookahead_secs, 1.0);
        assert_eq!(config.guitar, Default::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = parse(
            r#"
[playback]
tempo_bpm = 90.5
lookahead_secs = 2.0
processing_margin_secs = 0.25

[guitar]
time_per_string = 0.03
strength = 0.6
chord_spacing_secs = 0.5

[midi]
port = "FluidSynth"
channel = 9

[telemetry]
log_level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.playback.tempo_bpm, 90.5);
        assert_eq!(config.playback.lookahead_secs, 2.0);
        assert_eq!(config.playback.processing_margin_secs, 0.25);
        assert_eq!(config.guitar.time_per_string, 0.03);
        assert_eq!(config.guitar.strength, 0.6);
        assert_eq!(config.guitar.chord_spacing_secs, 0.5);
        assert_eq!(config.midi.port, "FluidSynth");
        assert_eq!(config.midi.channel, 9);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_wrong_types_are_reported() {
        for bad in [
            "playback = 3",
            "[playback]\ntempo_bpm = \"fast\"",
            "[midi]\nchannel = 16",
            "[midi]\nport = 7",
            "not toml at all [",
        ] {
            assert!(
                matches!(parse(bad), Err(ConfigError::Parse { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STRUM_TEMPO", "96"),
            ("STRUM_STRENGTH", "not a number"),
            ("STRUM_MIDI_CHANNEL", "3"),
            ("RUST_LOG", "strum=trace"),
        ]
        .into_iter()
        .collect();

        let mut config = StrumConfig::default();
        let mut sources = ConfigSources::default();
        apply_env_overrides(&mut config, &mut sources, |k| {
            vars.get(k).map(|v| v.to_string())
        });

        assert_eq!(config.playback.tempo_bpm, 96.0);
        assert_eq!(config.guitar.strength, 0.8);
        assert_eq!(config.midi.channel, 3);
        assert_eq!(config.telemetry.log_level, "strum=trace");
        assert_eq!(
            sources.env_overrides,
            ["STRUM_TEMPO", "STRUM_MIDI_CHANNEL", "RUST_LOG"]
        );
    }
}
