//! One fretted string.

use channel::{check_strength, Channel};
use tonal::Tone;
use tracing::trace;

use crate::Result;

/// Fret value meaning "don't play this string".
pub const MUTED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringState {
    Muted,
    Pressed,
    Sounding,
}

/// A string with an open tone, a pressed fret, and whether it is ringing.
///
/// A string that is still sounding when pressed or plucked again is
/// stopped first, at the same instant.
#[derive(Debug, Clone)]
pub struct FrettedString {
    base: Tone,
    fret: i32,
    sounding: bool,
}

impl FrettedString {
    /// An open string, not sounding.
    pub fn new(base: Tone) -> Self {
        FrettedString {
            base,
            fret: 0,
            sounding: false,
        }
    }

    pub fn base(&self) -> Tone {
        self.base
    }

    pub fn fret(&self) -> i32 {
        self.fret
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    pub fn state(&self) -> StringState {
        if self.sounding {
            StringState::Sounding
        } else if self.fret < 0 {
            StringState::Muted
        } else {
            StringState::Pressed
        }
    }

    /// Tone at the current fret, or `None` when muted.
    pub fn tone(&self) -> Option<Tone> {
        u32::try_from(self.fret).ok().map(|fret| self.base + fret)
    }

    fn stop(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        if self.sounding {
            if let Some(tone) = self.tone() {
                trace!(time, tone = %tone, "string stopped");
                channel.stop_note(time, tone, 0.0)?;
            }
            self.sounding = false;
        }
        Ok(())
    }

    /// Stop any ringing note, then hold `fret` (negative mutes).
    pub fn press(&mut self, time: f64, fret: i32, channel: &mut dyn Channel) -> Result<()> {
        self.stop(time, channel)?;
        self.fret = fret;
        Ok(())
    }

    /// Stop any ringing note, then sound the pressed fret. Returns whether
    /// the string sounded; a muted string stays silent.
    pub fn pluck(&mut self, time: f64, strength: f64, channel: &mut dyn Channel) -> Result<bool> {
        check_strength(strength)?;
        self.stop(time, channel)?;

        let Some(tone) = self.tone() else {
            return Ok(false);
        };
        trace!(time, tone = %tone, strength, "string plucked");
        channel.start_note(time, tone, strength)?;
        self.sounding = true;
        Ok(true)
    }

    pub fn silence(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        self.press(time, MUTED, channel)
    }

    /// Damp the string but keep the fret.
    pub fn mute(&mut self, time: f64, channel: &mut dyn Channel) -> Result<()> {
        self.press(time, self.fret, channel)
    }
}
