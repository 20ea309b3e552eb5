//! Six strings, chord shapes and strumming.

use channel::Channel;
use tonal::{Chord, Tone};
use tracing::{debug, warn};

use crate::shapes::{chord_shape, chord_symbol};
use crate::string::{FrettedString, MUTED};
use crate::{FretboardError, Result};

pub const STRINGS: usize = 6;

/// Standard tuning, low to high: e3 a3 d4 g4 b4 e5.
pub const STANDARD_TUNING: [u32; STRINGS] = [40, 45, 50, 55, 59, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// From the low string towards the high string.
    #[default]
    Down,
    Up,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Down => 1,
            Direction::Up => -1,
        }
    }
}

/// How a strum moves across the strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrumParams {
    /// Seconds between consecutive strings that sound.
    pub time_per_string: f64,
    pub direction: Direction,
    /// First string to pluck; values past 5 are clamped.
    pub start_string: usize,
    pub num_strings: usize,
    pub strength: f64,
}

impl Default for StrumParams {
    fn default() -> Self {
        StrumParams {
            time_per_string: 1.0 / 16.0,
            direction: Direction::Down,
            start_string: 0,
            num_strings: STRINGS,
            strength: 0.8,
        }
    }
}

impl StrumParams {
    /// Up-strum from the top string, otherwise default.
    pub fn up() -> Self {
        StrumParams {
            direction: Direction::Up,
            start_string: STRINGS - 1,
            ..Self::default()
        }
    }
}

/// A six-string guitar.
///
/// Call [`Guitar::silence`] before dropping it; a guitar dropped with
/// strings still ringing cannot stop them and only logs a warning.
#[derive(Debug)]
pub struct Guitar {
    strings: [FrettedString; STRINGS],
}

impl Default for Guitar {
    fn default() -> Self {
        Self::new()
    }
}

impl Guitar {
    pub fn new() -> Self {
        Self::with_tuning(STANDARD_TUNING.map(Tone::from_index))
    }

    pub fn with_tuning(tuning: [Tone; STRINGS]) -> Self {
        Guitar {
            strings: tuning.map(FrettedString::new),
        }
    }

    pub fn strings(&self) -> &[FrettedString; STRINGS] {
        &self.strings
    }

    pub fn is_sounding(&self) -> bool {
        self.strings.iter().any(FrettedString::is_sounding)
    }

    pub fn press_fret(
        &mut self,
        time: f64,
        string: usize,
        fret: i32,
        channel: &mut dyn Channel,
    ) -> Result<()> {
        self.strings
            .get_mut(string)
            .ok_or(FretboardError::NoSuchString(string))?
            .press(time, fret, channel)
    }

    pub fn press_frets(
        &mut self,
        time: f64,
        frets: [i32; STRINGS],
        channel: &mut dyn Channel,
    ) -> Result<()> {
        for (string, fret) in self.strings.iter_mut().zip(frets) {
            string.press(time, fret, channel)?;
        }
        Ok(())
    }

    /// Hold the shape for `symbol`, e.g. `"Am"` or `"G7"`.
    pub fn press_chord(&mut self, time: f64, symbol: &str, channel: &mut dyn Channel) -> Result<()> {
        let frets = chord_shape(symbol)?;
        debug!(time, symbol, "press chord");
        self.press_frets(time, frets, channel)
    }

    /// Hold the shape for a scale-built chord such as a major triad.
    pub fn press_scale_chord(
        &mut self,
        time: f64,
        chord: &Chord,
        channel: &mut dyn Channel,
    ) -> Result<()> {
        let symbol =
            chord_symbol(chord).ok_or_else(|| FretboardError::UnknownChord(chord.to_string()))?;
        self.press_chord(time, &symbol, channel)
    }

    /// Pluck up to `num_strings` strings starting at `start_string`,
    /// moving in `direction` until the edge of the neck.
    ///
    /// Muted strings are skipped without using up time. Returns each string
    /// that sounded with the time it was plucked.
    pub fn strum(
        &mut self,
        time: f64,
        params: &StrumParams,
        channel: &mut dyn Channel,
    ) -> Result<Vec<(usize, f64)>> {
        let step = params.direction.step();
        let mut index = params.start_string.min(STRINGS - 1) as isize;
        let mut at = time;
        let mut sounded = Vec::with_capacity(params.num_strings.min(STRINGS));

        for _ in 0..params.num_strings {
            let Some(string) = usize::try_from(index)
                .ok()
                .and_then(|i| self.strings.get_mut(i))
            else {
                break;
            };
            if string.pluck(at, params.strength, channel)? {
                sounded.push((index as usize, at));
                at += params.time_per_string;
            }
            index += step;
        }

        debug!(
            time,
            direction = ?params.direction,
            sounded = sounded.len(),
            "strum"
        );
        Ok(sounded)
    }

    /// Stop and mute every string.
    pub fn silence(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        self.press_frets(time, [MUTED; STRINGS], channel)
    }

    /// Damp every string, keeping the chord held.
    pub fn mute(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        for string in &mut self.strings {
            string.mute(time, channel)?;
        }
        Ok(())
    }
}

impl Drop for Guitar {
    fn drop(&mut self) {
        if self.is_sounding() {
            warn!("guitar dropped with strings still sounding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel::{EventKind, LogChannel};
    use pretty_assertions::assert_eq;

    fn note_ons(log: &LogChannel) -> Vec<(f64, u32)> {
        log.events()
            .iter()
            .filter(|e| e.kind == EventKind::NoteOn)
            .filter_map(|e| e.index.map(|i| (e.time, i)))
            .collect()
    }

    #[test]
    fn standard_tuning() {
        let guitar = Guitar::new();
        let open: Vec<u32> = guitar.strings().iter().map(|s| s.base().index()).collect();
        assert_eq!(open, STANDARD_TUNING);
        let names: Vec<String> = guitar.strings().iter().map(|s| s.base().to_string()).collect();
        assert_eq!(names, ["e3", "a3", "d4", "g4", "b4", "e5"]);
    }

    #[test]
    fn down_strum_over_open_strings() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        let dt = 0.0625;
        let sounded = guitar
            .strum(1.0, &StrumParams::default(), &mut log)
            .unwrap();

        let expected: Vec<(usize, f64)> = (0..6).map(|i| (i, 1.0 + i as f64 * dt)).collect();
        assert_eq!(sounded, expected);
        assert_eq!(
            note_ons(&log),
            [
                (1.0, 40),
                (1.0625, 45),
                (1.125, 50),
                (1.1875, 55),
                (1.25, 59),
                (1.3125, 64)
            ]
        );
        guitar.silence(2.0, &mut log).unwrap();
    }

    #[test]
    fn muted_strings_take_no_time() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        guitar.press_chord(0.0, "D", &mut log).unwrap();
        let sounded = guitar
            .strum(0.0, &StrumParams::default(), &mut log)
            .unwrap();
        assert_eq!(sounded, [(2, 0.0), (3, 0.0625), (4, 0.125), (5, 0.1875)]);
        assert_eq!(note_ons(&log)[0], (0.0, 50));
        guitar.silence(1.0, &mut log).unwrap();
    }

    #[test]
    fn interior_mute_is_skipped_without_a_gap() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        let dt = 0.0625;
        guitar
            .press_frets(0.0, [0, 0, MUTED, 0, 0, 0], &mut log)
            .unwrap();
        let sounded = guitar
            .strum(0.0, &StrumParams::default(), &mut log)
            .unwrap();

        let strings: Vec<usize> = sounded.iter().map(|(s, _)| *s).collect();
        assert_eq!(strings, [0, 1, 3, 4, 5]);
        assert_eq!(sounded[2].1 - sounded[1].1, dt);
        assert_eq!(sounded.last(), Some(&(5, 4.0 * dt)));

        // the d4 string never sounds
        assert!(note_ons(&log).iter().all(|(_, index)| *index != 50));
        guitar.silence(1.0, &mut log).unwrap();
    }

    #[test]
    fn up_strum_from_top() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        guitar.press_chord(0.0, "C", &mut log).unwrap();
        let params = StrumParams {
            time_per_string: 0.5,
            ..StrumParams::up()
        };
        let sounded = guitar.strum(0.0, &params, &mut log).unwrap();
        let order: Vec<usize> = sounded.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, [5, 4, 3, 2, 1]);
        assert_eq!(sounded.last(), Some(&(1, 2.0)));
        guitar.silence(3.0, &mut log).unwrap();
    }

    #[test]
    fn strum_stops_at_the_edge() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        let params = StrumParams {
            start_string: 4,
            num_strings: 6,
            ..StrumParams::default()
        };
        let sounded = guitar.strum(0.0, &params, &mut log).unwrap();
        assert_eq!(sounded.len(), 2);

        let params = StrumParams {
            start_string: 99,
            num_strings: 2,
            direction: Direction::Up,
            ..StrumParams::default()
        };
        let sounded = guitar.strum(1.0, &params, &mut log).unwrap();
        let order: Vec<usize> = sounded.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, [5, 4]);
        guitar.silence(2.0, &mut log).unwrap();
    }

    #[test]
    fn restrum_stops_ringing_strings() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        guitar.strum(0.0, &StrumParams::default(), &mut log).unwrap();
        guitar.strum(1.0, &StrumParams::default(), &mut log).unwrap();
        let offs = log
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::NoteOff)
            .count();
        assert_eq!(offs, 6);
        guitar.silence(2.0, &mut log).unwrap();
        assert!(!guitar.is_sounding());
    }

    #[test]
    fn press_scale_chord_uses_symbol() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        let e = Tone::from_glyph("e", None).unwrap();
        let chord = Chord::new(tonal::Scale::major(e), "5th", 1).unwrap();
        guitar.press_scale_chord(0.0, &chord, &mut log).unwrap();
        let frets: Vec<i32> = guitar.strings().iter().map(|s| s.fret()).collect();
        assert_eq!(frets, [0, 2, 2, 1, 0, 0]);

        let seventh = Chord::new(tonal::Scale::major(e), "7th", 1).unwrap();
        assert!(matches!(
            guitar.press_scale_chord(0.0, &seventh, &mut log),
            Err(FretboardError::UnknownChord(_))
        ));
    }

    #[test]
    fn bad_string_and_chord() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        assert!(matches!(
            guitar.press_fret(0.0, 6, 1, &mut log),
            Err(FretboardError::NoSuchString(6))
        ));
        assert!(matches!(
            guitar.press_chord(0.0, "Hm", &mut log),
            Err(FretboardError::UnknownChord(_))
        ));
    }

    #[test]
    fn silence_stops_everything_once() {
        let mut log = LogChannel::new();
        let mut guitar = Guitar::new();
        guitar.press_chord(0.0, "E", &mut log).unwrap();
        guitar.strum(0.0, &StrumParams::default(), &mut log).unwrap();
        guitar.silence(1.0, &mut log).unwrap();
        guitar.silence(2.0, &mut log).unwrap();
        assert_eq!(log.events().len(), 12);
        assert!(guitar
            .strings()
            .iter()
            .all(|s| s.fret() == MUTED && !s.is_sounding()));
    }
}
