//! Commands that send notes to a channel.

use anyhow::{Context, Result};
use channel::Channel;
use fretboard::{FretboardError, Guitar, StrumParams, TwelveStringGuitar};
use sequencer::{tune, Pacing, Rhythm, Sleeper};
use strumconf::StrumConfig;
use tracing::{debug, info};

pub fn pacing(config: &StrumConfig) -> Pacing {
    Pacing {
        lookahead_secs: config.playback.lookahead_secs,
        processing_margin_secs: config.playback.processing_margin_secs,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TwinkleOptions {
    /// Overrides `playback.tempo_bpm`.
    pub tempo: Option<f64>,
    pub reverse: bool,
    pub flip: bool,
}

/// Play the nursery tune from `start`, returning once its last note ends.
pub fn twinkle(
    channel: &mut dyn Channel,
    start: f64,
    config: &StrumConfig,
    options: &TwinkleOptions,
    sleeper: &mut dyn Sleeper,
) -> Result<()> {
    let bpm = options.tempo.unwrap_or(config.playback.tempo_bpm);
    let rhythm = Rhythm::new(bpm).context("Invalid tempo")?;
    let mut melody = tune::twinkle(rhythm)?;

    if options.reverse {
        melody.reverse();
    }
    if options.flip {
        melody.flip_chromatic().context("Failed to flip tune")?;
    }

    info!(
        notes = melody.len(),
        bpm,
        secs = melody.duration_secs(),
        "playing twinkle"
    );
    melody.play_and_wait_with(start, channel, &pacing(config), sleeper)
        .context("Playback failed")?;
    Ok(())
}

/// Six or twelve strings, driven the same way.
pub enum Instrument {
    Six(Guitar),
    Twelve(TwelveStringGuitar),
}

impl Instrument {
    pub fn new(twelve: bool) -> Self {
        if twelve {
            Instrument::Twelve(TwelveStringGuitar::new())
        } else {
            Instrument::Six(Guitar::new())
        }
    }

    fn press_chord(
        &mut self,
        time: f64,
        symbol: &str,
        channel: &mut dyn Channel,
    ) -> Result<(), FretboardError> {
        match self {
            Instrument::Six(g) => g.press_chord(time, symbol, channel),
            Instrument::Twelve(g) => g.press_chord(time, symbol, channel),
        }
    }

    fn strum(
        &mut self,
        time: f64,
        params: &StrumParams,
        channel: &mut dyn Channel,
    ) -> Result<Vec<(usize, f64)>, FretboardError> {
        match self {
            Instrument::Six(g) => g.strum(time, params, channel),
            Instrument::Twelve(g) => g.strum(time, params, channel),
        }
    }

    fn silence(&mut self, time: f64, channel: &mut dyn Channel) -> Result<(), FretboardError> {
        match self {
            Instrument::Six(g) => g.silence(time, channel),
            Instrument::Twelve(g) => g.silence(time, channel),
        }
    }
}

/// Even-numbered chords strum down from the low string, odd ones up.
fn stroke(position: usize, config: &StrumConfig) -> StrumParams {
    let base = if position % 2 == 1 {
        StrumParams::up()
    } else {
        StrumParams::default()
    };
    StrumParams {
        time_per_string: config.guitar.time_per_string,
        strength: config.guitar.strength,
        ..base
    }
}

/// Strum each chord in turn, `guitar.chord_spacing_secs` apart, then
/// silence the strings and wait for the channel to catch up.
///
/// Returns the number of strings that sounded.
pub fn chords(
    channel: &mut dyn Channel,
    start: f64,
    symbols: &[String],
    instrument: &mut Instrument,
    config: &StrumConfig,
    sleeper: &mut dyn Sleeper,
) -> Result<usize> {
    let mut time = start;
    let mut sounded = 0;

    for (position, symbol) in symbols.iter().enumerate() {
        instrument
            .press_chord(time, symbol, channel)
            .with_context(|| format!("Cannot play chord {symbol:?}"))?;
        let strings = instrument.strum(time, &stroke(position, config), channel)?;
        debug!(symbol = %symbol, time, strings = strings.len(), "chord");
        sounded += strings.len();
        time += config.guitar.chord_spacing_secs;
    }

    instrument.silence(time, channel)?;
    wait_until(channel, time, sleeper);
    Ok(sounded)
}

fn wait_until(channel: &dyn Channel, end: f64, sleeper: &mut dyn Sleeper) {
    let delta = end - channel.now();
    if delta > 0.0 {
        sleeper.sleep(delta);
    }
}
