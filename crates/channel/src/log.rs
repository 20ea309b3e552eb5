//! A channel that records what it is asked to play.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tonal::Tone;
use tracing::trace;

use crate::{check_strength, Channel, ChannelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOn,
    NoteOff,
    AllOff,
}

impl EventKind {
    fn as_str(&self) -> &'static str {
        match self {
            EventKind::NoteOn => "note_on",
            EventKind::NoteOff => "note_off",
            EventKind::AllOff => "all_notes_off",
        }
    }
}

/// One recorded event. `index` is absent for [`EventKind::AllOff`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub time: f64,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub strength: f64,
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "{:.6} {} {} {:.6}",
                self.time,
                self.kind.as_str(),
                index,
                self.strength
            ),
            None => write!(f, "{:.6} {}", self.time, self.kind.as_str()),
        }
    }
}

/// Line format used when a [`LogChannel`] streams to a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn render(&self, event: &NoteEvent) -> Result<String> {
        match self {
            LogFormat::Text => Ok(event.to_string()),
            LogFormat::Json => serde_json::to_string(event).map_err(ChannelError::failure),
        }
    }
}

/// Records every event it receives, optionally echoing each as a line.
///
/// Its clock is the latest time it has been told about, so producers that
/// pace themselves against `now` never wait on it.
#[derive(Default)]
pub struct LogChannel {
    events: Vec<NoteEvent>,
    now: f64,
    sink: Option<(Box<dyn Write + Send>, LogFormat)>,
}

impl LogChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write each event to `writer` as it arrives.
    pub fn with_writer(writer: Box<dyn Write + Send>, format: LogFormat) -> Self {
        LogChannel {
            sink: Some((writer, format)),
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<NoteEvent> {
        std::mem::take(&mut self.events)
    }

    /// All recorded events rendered one per line.
    pub fn render(&self, format: LogFormat) -> Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&format.render(event)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn record(&mut self, event: NoteEvent) -> Result<()> {
        trace!(time = event.time, kind = ?event.kind, index = ?event.index, "note event");
        self.now = self.now.max(event.time);

        if let Some((writer, format)) = self.sink.as_mut() {
            let line = format.render(&event)?;
            writeln!(writer, "{}", line).map_err(ChannelError::failure)?;
        }

        self.events.push(event);
        Ok(())
    }
}

impl fmt::Debug for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogChannel")
            .field("events", &self.events.len())
            .field("now", &self.now)
            .field("streaming", &self.sink.as_ref().map(|(_, format)| *format))
            .finish()
    }
}

impl Channel for LogChannel {
    fn now(&self) -> f64 {
        self.now
    }

    fn start_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        check_strength(strength)?;
        self.record(NoteEvent {
            time,
            kind: EventKind::NoteOn,
            index: Some(tone.index()),
            strength,
        })
    }

    fn stop_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
        self.record(NoteEvent {
            time,
            kind: EventKind::NoteOff,
            index: Some(tone.index()),
            strength,
        })
    }

    fn all_notes_off(&mut self) -> Result<()> {
        self.record(NoteEvent {
            time: self.now,
            kind: EventKind::AllOff,
            index: None,
            strength: 0.0,
        })
    }

    fn release(&mut self) -> Result<()> {
        if let Some((writer, _)) = self.sink.as_mut() {
            writer.flush().map_err(ChannelError::failure)?;
        }
        Ok(())
    }
}
