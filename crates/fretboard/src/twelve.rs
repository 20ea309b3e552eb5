//! Twelve-string guitar: two six-string guitars fretted and strummed together.

use channel::Channel;
use tonal::{Chord, Tone};

use crate::guitar::{Guitar, StrumParams, STANDARD_TUNING, STRINGS};
use crate::Result;

/// Tuning of the second string in each course: octaves on the four low
/// courses, unisons on the two high ones.
pub const OCTAVE_COURSE_TUNING: [u32; STRINGS] = [52, 57, 62, 67, 59, 64];

#[derive(Debug)]
pub struct TwelveStringGuitar {
    main: Guitar,
    octave: Guitar,
}

impl Default for TwelveStringGuitar {
    fn default() -> Self {
        Self::new()
    }
}

impl TwelveStringGuitar {
    pub fn new() -> Self {
        TwelveStringGuitar {
            main: Guitar::with_tuning(STANDARD_TUNING.map(Tone::from_index)),
            octave: Guitar::with_tuning(OCTAVE_COURSE_TUNING.map(Tone::from_index)),
        }
    }

    pub fn main_strings(&self) -> &Guitar {
        &self.main
    }

    pub fn octave_strings(&self) -> &Guitar {
        &self.octave
    }

    pub fn is_sounding(&self) -> bool {
        self.main.is_sounding() || self.octave.is_sounding()
    }

    pub fn press_frets(
        &mut self,
        time: f64,
        frets: [i32; STRINGS],
        channel: &mut dyn Channel,
    ) -> Result<()> {
        self.main.press_frets(time, frets, channel)?;
        self.octave.press_frets(time, frets, channel)
    }

    pub fn press_chord(&mut self, time: f64, symbol: &str, channel: &mut dyn Channel) -> Result<()> {
        self.main.press_chord(time, symbol, channel)?;
        self.octave.press_chord(time, symbol, channel)
    }

    pub fn press_scale_chord(
        &mut self,
        time: f64,
        chord: &Chord,
        channel: &mut dyn Channel,
    ) -> Result<()> {
        self.main.press_scale_chord(time, chord, channel)?;
        self.octave.press_scale_chord(time, chord, channel)
    }

    /// Strum both strings of every course at once. Returns the course and
    /// time of each string that sounded, ordered by time.
    pub fn strum(
        &mut self,
        time: f64,
        params: &StrumParams,
        channel: &mut dyn Channel,
    ) -> Result<Vec<(usize, f64)>> {
        let mut sounded = self.main.strum(time, params, channel)?;
        sounded.extend(self.octave.strum(time, params, channel)?);
        sounded.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(sounded)
    }

    pub fn silence(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        self.main.silence(time, channel)?;
        self.octave.silence(time, channel)
    }

    pub fn mute(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        self.main.mute(time, channel)?;
        self.octave.mute(time, channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel::{EventKind, LogChannel};
    use pretty_assertions::assert_eq;

    #[test]
    fn courses_sound_together() {
        let mut log = LogChannel::new();
        let mut twelve = TwelveStringGuitar::new();
        twelve.press_chord(0.0, "A", &mut log).unwrap();
        let sounded = twelve
            .strum(0.0, &StrumParams::default(), &mut log)
            .unwrap();
        assert_eq!(sounded.len(), 12);
        assert_eq!(&sounded[..2], &[(0, 0.0), (0, 0.0)]);

        let mut ons: Vec<u32> = log
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::NoteOn && e.time == 0.0)
            .filter_map(|e| e.index)
            .collect();
        ons.sort();
        assert_eq!(ons, [40, 52]);

        twelve.silence(1.0, &mut log).unwrap();
        assert!(!twelve.is_sounding());
    }

    #[test]
    fn octave_course_tuning() {
        let twelve = TwelveStringGuitar::new();
        for (main, octave) in twelve
            .main_strings()
            .strings()
            .iter()
            .zip(twelve.octave_strings().strings())
        {
            let gap = octave.base().index() - main.base().index();
            assert!(gap == 12 || gap == 0);
        }
    }
}
