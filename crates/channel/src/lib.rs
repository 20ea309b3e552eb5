//! Timed note sinks.
//!
//! Everything that makes sound (or pretends to) implements [`Channel`]:
//! notes are started and stopped at absolute times in seconds on the
//! channel's own clock. Producers never hold a channel across calls; they
//! borrow one per operation, and the owner wraps it in a [`Session`] so
//! that hanging notes are cut off however the owner exits.

pub mod log;
pub mod midi;
pub mod session;

pub use log::{EventKind, LogChannel, LogFormat, NoteEvent};
pub use midi::{encode_midi_message, velocity, MidiError, MidiMessage};
#[cfg(feature = "midi")]
pub use midi::MidiChannel;
pub use session::{with_session, Session};

use tonal::Tone;

/// Errors reported by channels.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("strength {strength} is outside [0, 1]")]
    OutOfRange { strength: f64 },

    #[error("tone index {index} does not fit in a MIDI note number")]
    ToneOutOfMidiRange { index: u32 },

    #[error("channel failure: {0}")]
    Failure(Box<dyn std::error::Error + Send + Sync>),
}

impl ChannelError {
    /// Wrap a sink-specific error.
    pub fn failure<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ChannelError::Failure(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;

/// Rejects strengths outside `[0, 1]` (NaN included).
pub fn check_strength(strength: f64) -> Result<()> {
    if (0.0..=1.0).contains(&strength) {
        Ok(())
    } else {
        Err(ChannelError::OutOfRange { strength })
    }
}

/// A sink for timed note events.
pub trait Channel {
    /// Current time on this channel's clock, in seconds. Never decreases.
    fn now(&self) -> f64;

    /// Start sounding `tone` at `time`. Fails with
    /// [`ChannelError::OutOfRange`] when `strength` is outside `[0, 1]`.
    fn start_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()>;

    fn stop_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()>;

    fn play_note(&mut self, start: f64, stop: f64, tone: Tone, strength: f64) -> Result<()> {
        self.start_note(start, tone, strength)?;
        self.stop_note(stop, tone, strength)
    }

    /// Silence everything immediately.
    fn all_notes_off(&mut self) -> Result<()>;

    /// Give back any device held by the channel.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn start_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).start_note(time, tone, strength)
    }

    fn stop_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).stop_note(time, tone, strength)
    }

    fn play_note(&mut self, start: f64, stop: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).play_note(start, stop, tone, strength)
    }

    fn all_notes_off(&mut self) -> Result<()> {
        (**self).all_notes_off()
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn start_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).start_note(time, tone, strength)
    }

    fn stop_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).stop_note(time, tone, strength)
    }

    fn play_note(&mut self, start: f64, stop: f64, tone: Tone, strength: f64) -> Result<()> {
        (**self).play_note(start, stop, tone, strength)
    }

    fn all_notes_off(&mut self) -> Result<()> {
        (**self).all_notes_off()
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_bounds_are_inclusive() {
        assert!(check_strength(0.0).is_ok());
        assert!(check_strength(1.0).is_ok());
        assert!(matches!(
            check_strength(1.01),
            Err(ChannelError::OutOfRange { .. })
        ));
        assert!(check_strength(-0.1).is_err());
        assert!(check_strength(f64::NAN).is_err());
    }

    #[test]
    fn play_note_starts_then_stops() {
        let mut channel = LogChannel::new();
        let a = Tone::from_index(57);
        channel.play_note(1.0, 1.5, a, 0.5).unwrap();

        let kinds: Vec<EventKind> = channel.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::NoteOn, EventKind::NoteOff]);
        assert_eq!(channel.now(), 1.5);
    }

    #[test]
    fn boxed_and_borrowed_channels_forward() {
        let mut log = LogChannel::new();
        {
            let borrowed: &mut dyn Channel = &mut log;
            borrowed.start_note(0.25, Tone::from_index(60), 1.0).unwrap();
        }
        assert_eq!(log.events().len(), 1);

        let mut boxed: Box<dyn Channel> = Box::new(LogChannel::new());
        boxed.all_notes_off().unwrap();
        assert!(boxed.start_note(0.0, Tone::from_index(60), 2.0).is_err());
    }
}
