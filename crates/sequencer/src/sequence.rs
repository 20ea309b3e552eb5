//! The sequence container and its transformations.

use std::cmp::Ordering;

use channel::Channel;
use serde::Serialize;
use tonal::{Scale, Tone};
use tracing::{debug, trace};

use crate::note::{Note, SequenceNote};
use crate::pacing::{Pacing, Sleeper, ThreadSleeper};
use crate::rhythm::Rhythm;
use crate::{Result, SequenceError};

/// Notes ordered by beat, with the tempo that places them in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    notes: Vec<SequenceNote>,
    rhythm: Rhythm,
}

fn by_beat(a: &SequenceNote, b: &SequenceNote) -> Ordering {
    a.beat
        .total_cmp(&b.beat)
        .then(a.note.duration().total_cmp(&b.note.duration()))
        .then(a.note.strength().total_cmp(&b.note.strength()))
}

impl Sequence {
    pub fn new(rhythm: Rhythm) -> Self {
        Sequence {
            notes: Vec::new(),
            rhythm,
        }
    }

    pub fn rhythm(&self) -> Rhythm {
        self.rhythm
    }

    pub fn notes(&self) -> &[SequenceNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Beat right after the last note: where [`Sequence::append`] puts the
    /// next one.
    pub fn next_beat(&self) -> f64 {
        self.notes.last().map_or(0.0, SequenceNote::end_beat)
    }

    /// Length of the sequence in seconds at its own tempo.
    pub fn duration_secs(&self) -> f64 {
        let end = self
            .notes
            .iter()
            .map(SequenceNote::end_beat)
            .fold(0.0, f64::max);
        end / self.rhythm.beats_per_second()
    }

    pub fn append(&mut self, note: Note) {
        let beat = self.next_beat();
        self.notes.push(SequenceNote::new(beat, note));
    }

    /// Copy `other`'s notes onto the end of this sequence.
    ///
    /// Beats and durations are rescaled by the ratio of the two tempos so
    /// the appended block keeps its length in seconds.
    pub fn append_sequence(&mut self, other: &Sequence) {
        let ratio = self.rhythm.beats_per_second() / other.rhythm.beats_per_second();
        let offset = self.next_beat();
        self.notes.extend(
            other
                .notes
                .iter()
                .map(|sn| SequenceNote::new(offset + sn.beat * ratio, sn.note.scaled(ratio))),
        );
        debug!(
            appended = other.len(),
            ratio, offset, "appended sequence"
        );
    }

    /// Add a note at its own beat, keeping beat order. Ties go by duration
    /// and then strength; equal notes are both kept.
    pub fn insert(&mut self, note: SequenceNote) {
        self.notes.push(note);
        self.notes.sort_by(by_beat);
    }

    /// Mirror the notes in time: each beat becomes `max_beat - beat`.
    ///
    /// Reversing twice gives back dyadic beats (quarters, eighths) exactly;
    /// other fractions may move by a few ulps of `max_beat`.
    pub fn reverse(&mut self) {
        let Some(max_beat) = self.notes.iter().map(|sn| sn.beat).reduce(f64::max) else {
            return;
        };
        for sn in &mut self.notes {
            sn.beat = max_beat - sn.beat;
        }
        self.notes.sort_by(by_beat);
    }

    /// Invert the melody within its own range, counting steps along
    /// `reference`.
    ///
    /// The lowest and highest tones present swap places and everything in
    /// between mirrors around them. Nothing changes if any tone, or its
    /// mirror image, falls outside `reference`.
    pub fn flip(&mut self, reference: &Scale) -> Result<()> {
        let lowest = self.notes.iter().map(|sn| sn.note.tone()).min();
        let highest = self.notes.iter().map(|sn| sn.note.tone()).max();
        let (Some(lowest), Some(highest)) = (lowest, highest) else {
            return Err(SequenceError::EmptySequence);
        };

        let position = |tone: Tone| {
            reference
                .position(tone)
                .ok_or(SequenceError::ToneNotInScale { tone })
        };
        let pivot = position(lowest)? + position(highest)?;

        let flipped = self
            .notes
            .iter()
            .map(|sn| {
                let tone = sn.note.tone();
                pivot
                    .checked_sub(position(tone)?)
                    .and_then(|p| reference.tones().get(p).copied())
                    .ok_or(SequenceError::ToneNotInScale { tone })
            })
            .collect::<Result<Vec<Tone>>>()?;

        for (sn, tone) in self.notes.iter_mut().zip(flipped) {
            sn.note = sn.note.retuned(tone);
        }
        Ok(())
    }

    /// [`Sequence::flip`] against twelve chromatic octaves from c0.
    pub fn flip_chromatic(&mut self) -> Result<()> {
        self.flip(&Scale::chromatic_reference())
    }

    fn times(&self, start_time: f64, sn: &SequenceNote) -> (f64, f64) {
        let bps = self.rhythm.beats_per_second();
        (
            start_time + sn.beat / bps,
            start_time + sn.end_beat() / bps,
        )
    }

    /// Send every note to `channel` and return without waiting.
    pub fn play(&self, start_time: f64, channel: &mut dyn Channel) -> Result<()> {
        debug!(notes = self.len(), start_time, "playing sequence");
        for sn in &self.notes {
            let (start, end) = self.times(start_time, sn);
            trace!(start, end, tone = %sn.note.tone(), "note");
            channel.play_note(start, end, sn.note.tone(), sn.note.strength())?;
        }
        Ok(())
    }

    /// Send the notes no further ahead of the channel clock than `pacing`
    /// allows, sleeping the thread in between, and return once the last
    /// note has ended.
    pub fn play_and_wait(
        &self,
        start_time: f64,
        channel: &mut dyn Channel,
        pacing: &Pacing,
    ) -> Result<()> {
        self.play_and_wait_with(start_time, channel, pacing, &mut ThreadSleeper)
    }

    /// [`Sequence::play_and_wait`] with a caller-supplied sleeper.
    pub fn play_and_wait_with(
        &self,
        start_time: f64,
        channel: &mut dyn Channel,
        pacing: &Pacing,
        sleeper: &mut dyn Sleeper,
    ) -> Result<()> {
        debug!(notes = self.len(), start_time, "playing sequence and waiting");

        let mut horizon = channel.now() + pacing.window();
        let mut last_end = None;

        for sn in &self.notes {
            let (start, end) = self.times(start_time, sn);
            trace!(start, end, tone = %sn.note.tone(), "note");
            channel.play_note(start, end, sn.note.tone(), sn.note.strength())?;
            last_end = Some(end);

            if end > horizon {
                let delta = horizon - channel.now();
                if delta > 0.0 {
                    sleeper.sleep(delta);
                }
                horizon = channel.now() + pacing.window();
            }
        }

        if let Some(end) = last_end {
            let delta = end - channel.now();
            if delta > 0.0 {
                sleeper.sleep(delta);
            }
        }
        debug!("sequence finished");
        Ok(())
    }
}
