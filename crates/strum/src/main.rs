mod play;
mod telemetry;
mod theory;

use std::path::PathBuf;

use anyhow::{Context, Result};
use channel::{with_session, Channel, LogChannel, LogFormat};
use clap::{Parser, Subcommand, ValueEnum};
use sequencer::ThreadSleeper;
use strumconf::StrumConfig;
use tonal::Tone;

use play::{Instrument, TwinkleOptions};

/// Play tunes, strum chords and explore scales.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use in place of ./strum.toml
    #[arg(short, long, env = "STRUM_CONFIG")]
    config: Option<PathBuf>,

    /// Where notes go
    #[arg(long, value_enum, default_value_t = Sink::Log)]
    sink: Sink,

    /// Write JSON lines instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play "Twinkle Twinkle Little Star"
    Twinkle {
        /// Beats per minute (default: playback.tempo_bpm)
        #[arg(long)]
        tempo: Option<f64>,

        /// Play it back to front
        #[arg(long)]
        reverse: bool,

        /// Turn the melody upside down
        #[arg(long)]
        flip: bool,
    },

    /// Strum chords by symbol, alternating down and up strokes
    Chords {
        /// Chord symbols, e.g. G C D Em
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Use a twelve-string guitar
        #[arg(long)]
        twelve: bool,
    },

    /// Rank the twelve transpositions of a scale by shared tones
    Similar {
        tonic: Tone,

        #[arg(long, default_value = "major")]
        pattern: String,
    },

    /// Find the scales that contain every given tone
    Scales {
        #[arg(required = true)]
        tones: Vec<Tone>,

        /// Scale patterns to search (repeatable)
        #[arg(long = "pattern", default_values_t = ["major".to_string(), "minor".to_string()])]
        patterns: Vec<String>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sink {
    /// Print note events to stdout
    Log,
    /// Send note events to a MIDI output port
    Midi,
}

/// Notes sent to a device are scheduled this far ahead of its clock.
#[cfg(feature = "midi")]
const MIDI_LEAD_IN_SECS: f64 = 0.1;

fn open_channel(sink: Sink, json: bool, config: &StrumConfig) -> Result<(Box<dyn Channel>, f64)> {
    match sink {
        Sink::Log => {
            let format = if json { LogFormat::Json } else { LogFormat::Text };
            let channel = LogChannel::with_writer(Box::new(std::io::stdout()), format);
            Ok((Box::new(channel), 0.0))
        }
        #[cfg(feature = "midi")]
        Sink::Midi => {
            let channel = channel::MidiChannel::open(&config.midi.port, config.midi.channel)
                .context("Failed to open MIDI output")?;
            tracing::info!(
                port = channel.port_name(),
                channel = config.midi.channel,
                "MIDI output open"
            );
            let start = channel.now() + MIDI_LEAD_IN_SECS;
            Ok((Box::new(channel), start))
        }
        #[cfg(not(feature = "midi"))]
        Sink::Midi => {
            let _ = config;
            anyhow::bail!("strum was built without MIDI support; rebuild with --features midi")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = StrumConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    telemetry::init(&config.telemetry.log_level);
    tracing::debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    match cli.command {
        Command::Twinkle {
            tempo,
            reverse,
            flip,
        } => {
            let options = TwinkleOptions {
                tempo,
                reverse,
                flip,
            };
            let (channel, start) = open_channel(cli.sink, cli.json, &config)?;
            with_session(channel, |ch| {
                play::twinkle(ch, start, &config, &options, &mut ThreadSleeper)
            })?;
        }
        Command::Chords { symbols, twelve } => {
            let mut instrument = Instrument::new(twelve);
            let (channel, start) = open_channel(cli.sink, cli.json, &config)?;
            let sounded = with_session(channel, |ch| {
                play::chords(ch, start, &symbols, &mut instrument, &config, &mut ThreadSleeper)
            })?;
            tracing::info!(chords = symbols.len(), strings = sounded, "strummed");
        }
        Command::Similar { tonic, pattern } => {
            println!("{}", theory::similar(tonic, &pattern, cli.json)?);
        }
        Command::Scales { tones, patterns } => {
            println!("{}", theory::scales(&tones, &patterns, cli.json)?);
        }
        Command::Config => {
            for path in &sources.files {
                println!("# loaded: {}", path.display());
            }
            for var in &sources.env_overrides {
                println!("# env: {var}");
            }
            print!("{}", config.to_toml());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chords_take_symbols_and_sink() {
        let cli = Cli::try_parse_from([
            "strum", "--sink", "log", "--json", "chords", "G", "C", "--twelve",
        ])
        .unwrap();
        assert_eq!(cli.sink, Sink::Log);
        assert!(cli.json);
        match cli.command {
            Command::Chords { symbols, twelve } => {
                assert_eq!(symbols, ["G", "C"]);
                assert!(twelve);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn tones_are_parsed_by_clap() {
        let cli =
            Cli::try_parse_from(["strum", "scales", "c", "d", "e", "b", "--pattern", "dorian"])
                .unwrap();
        match cli.command {
            Command::Scales { tones, patterns } => {
                assert_eq!(tones.len(), 4);
                assert_eq!(patterns, ["dorian"]);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["strum", "similar", "h"]).is_err());
    }

    #[test]
    fn scales_search_major_and_minor_by_default() {
        let cli = Cli::try_parse_from(["strum", "scales", "c"]).unwrap();
        match cli.command {
            Command::Scales { patterns, .. } => assert_eq!(patterns, ["major", "minor"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_sink_opens_at_time_zero() {
        let (channel, start) = open_channel(Sink::Log, false, &StrumConfig::default()).unwrap();
        assert_eq!(channel.now(), 0.0);
        assert_eq!(start, 0.0);
    }

    #[cfg(not(feature = "midi"))]
    #[test]
    fn midi_sink_needs_the_feature() {
        let Err(err) = open_channel(Sink::Midi, false, &StrumConfig::default()) else {
            panic!("MIDI sink opened without the midi feature");
        };
        assert!(err.to_string().contains("--features midi"));
    }
}
