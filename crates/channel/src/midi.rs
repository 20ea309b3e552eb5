//! MIDI encoding, and a device channel built on midir (feature `midi`).
//!
//! Encoding is always available. The device channel queues messages by
//! timestamp and hands them to a dispatch thread, which sends each one when
//! its time comes; `now` is seconds since the port was opened.

use tonal::Tone;

use crate::{check_strength, ChannelError, Result};

/// Controller number for "all notes off".
pub const ALL_NOTES_OFF_CC: u8 = 0x7B;

/// Error type for MIDI device operations
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("Failed to initialize MIDI: {0}")]
    InitFailed(String),

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

impl From<MidiError> for ChannelError {
    fn from(err: MidiError) -> Self {
        ChannelError::failure(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiMessage {
    pub fn note_on(channel: u8, tone: Tone, strength: f64) -> Result<Self> {
        check_strength(strength)?;
        Ok(MidiMessage::NoteOn {
            channel,
            pitch: pitch(tone)?,
            velocity: velocity(strength),
        })
    }

    pub fn note_off(channel: u8, tone: Tone, strength: f64) -> Result<Self> {
        Ok(MidiMessage::NoteOff {
            channel,
            pitch: pitch(tone)?,
            velocity: velocity(strength),
        })
    }

    pub fn all_notes_off(channel: u8) -> Self {
        MidiMessage::ControlChange {
            channel,
            controller: ALL_NOTES_OFF_CC,
            value: 0,
        }
    }
}

/// MIDI velocity for a strength in `[0, 1]`. Out-of-range input is clamped.
pub fn velocity(strength: f64) -> u8 {
    (127.0 * strength.clamp(0.0, 1.0)).round() as u8
}

fn pitch(tone: Tone) -> Result<u8> {
    u8::try_from(tone.index())
        .ok()
        .filter(|p| *p <= 127)
        .ok_or(ChannelError::ToneOutOfMidiRange {
            index: tone.index(),
        })
}

/// Encode a MidiMessage to raw MIDI bytes
pub fn encode_midi_message(msg: &MidiMessage) -> Vec<u8> {
    match msg {
        MidiMessage::NoteOn {
            channel,
            pitch,
            velocity,
        } => vec![0x90 | (channel & 0x0F), *pitch, *velocity],
        MidiMessage::NoteOff {
            channel,
            pitch,
            velocity,
        } => vec![0x80 | (channel & 0x0F), *pitch, *velocity],
        MidiMessage::ControlChange {
            channel,
            controller,
            value,
        } => vec![0xB0 | (channel & 0x0F), *controller, *value],
    }
}

#[cfg(feature = "midi")]
pub use device::MidiChannel;

#[cfg(feature = "midi")]
mod device {
    use std::cmp::{Ordering, Reverse};
    use std::collections::BinaryHeap;
    use std::sync::{Arc, Condvar, Mutex};
    use std::thread::JoinHandle;
    use std::time::{Duration, Instant};

    use midir::{MidiOutput, MidiOutputConnection};
    use tonal::Tone;
    use tracing::{debug, info, trace, warn};

    use super::{encode_midi_message, MidiError, MidiMessage};
    use crate::{Channel, Result};

    /// A message waiting for its send time.
    struct Scheduled {
        at: f64,
        /// Note-offs rank before note-ons at the same instant.
        rank: u8,
        seq: u64,
        bytes: Vec<u8>,
    }

    impl Scheduled {
        fn key(&self) -> (f64, u8, u64) {
            (self.at, self.rank, self.seq)
        }
    }

    impl PartialEq for Scheduled {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other) == Ordering::Equal
        }
    }

    impl Eq for Scheduled {}

    impl PartialOrd for Scheduled {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Scheduled {
        fn cmp(&self, other: &Self) -> Ordering {
            let (a_at, a_rank, a_seq) = self.key();
            let (b_at, b_rank, b_seq) = other.key();
            a_at.total_cmp(&b_at)
                .then(a_rank.cmp(&b_rank))
                .then(a_seq.cmp(&b_seq))
        }
    }

    #[derive(Default)]
    struct Queue {
        heap: BinaryHeap<Reverse<Scheduled>>,
        next_seq: u64,
        shutdown: bool,
    }

    type Shared = Arc<(Mutex<Queue>, Condvar)>;

    /// Sends notes to a MIDI output port at their scheduled times.
    pub struct MidiChannel {
        shared: Shared,
        worker: Option<JoinHandle<()>>,
        epoch: Instant,
        channel: u8,
        port_name: String,
    }

    impl MidiChannel {
        /// Open the first output port whose name contains `port_pattern`
        /// (any port when empty) and start the dispatch thread.
        pub fn open(port_pattern: &str, channel: u8) -> std::result::Result<Self, MidiError> {
            let midi_out =
                MidiOutput::new("strum-out").map_err(|e| MidiError::InitFailed(e.to_string()))?;

            let ports = midi_out.ports();
            let port = ports
                .iter()
                .find(|p| {
                    midi_out
                        .port_name(p)
                        .map(|n| n.contains(port_pattern))
                        .unwrap_or(false)
                })
                .ok_or_else(|| MidiError::PortNotFound(port_pattern.to_string()))?;

            let port_name = midi_out
                .port_name(port)
                .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;

            let connection = midi_out
                .connect(port, "strum-output")
                .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;

            info!("Opened MIDI output: {}", port_name);

            let epoch = Instant::now();
            let shared: Shared = Arc::new((Mutex::new(Queue::default()), Condvar::new()));
            let worker_shared = Arc::clone(&shared);
            let worker = std::thread::Builder::new()
                .name("strum-midi".to_string())
                .spawn(move || dispatch(worker_shared, connection, epoch))
                .map_err(|e| MidiError::InitFailed(e.to_string()))?;

            Ok(MidiChannel {
                shared,
                worker: Some(worker),
                epoch,
                channel: channel & 0x0F,
                port_name,
            })
        }

        pub fn port_name(&self) -> &str {
            &self.port_name
        }

        fn schedule(&self, at: f64, msg: MidiMessage) -> Result<()> {
            let rank = match msg {
                MidiMessage::NoteOn { .. } => 1,
                _ => 0,
            };
            let (lock, cvar) = &*self.shared;
            let mut queue = lock
                .lock()
                .map_err(|_| MidiError::SendFailed("dispatch queue poisoned".to_string()))?;
            if queue.shutdown {
                return Err(MidiError::SendFailed("channel released".to_string()).into());
            }
            let seq = queue.next_seq;
            queue.next_seq += 1;
            queue.heap.push(Reverse(Scheduled {
                at,
                rank,
                seq,
                bytes: encode_midi_message(&msg),
            }));
            cvar.notify_one();
            Ok(())
        }

        fn shut_down(&mut self) {
            let (lock, cvar) = &*self.shared;
            if let Ok(mut queue) = lock.lock() {
                queue.shutdown = true;
            }
            cvar.notify_one();

            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    warn!("MIDI dispatch thread panicked");
                }
                info!("Closed MIDI output: {}", self.port_name);
            }
        }
    }

    /// Sends each queued message once it is due. On shutdown whatever is
    /// left goes out immediately, in order.
    fn dispatch(shared: Shared, mut connection: MidiOutputConnection, epoch: Instant) {
        let (lock, cvar) = &*shared;
        let Ok(mut queue) = lock.lock() else {
            return;
        };

        loop {
            let next_at = queue.heap.peek().map(|Reverse(next)| next.at);
            let wait = match next_at {
                Some(at) => {
                    let due = Duration::try_from_secs_f64(at.max(0.0))
                        .ok()
                        .and_then(|offset| epoch.checked_add(offset))
                        .unwrap_or(epoch);
                    let now = Instant::now();
                    if queue.shutdown || due <= now {
                        if let Some(Reverse(msg)) = queue.heap.pop() {
                            trace!(at = msg.at, bytes = ?msg.bytes, "midi send");
                            if let Err(e) = connection.send(&msg.bytes) {
                                warn!("MIDI send failed: {}", e);
                            }
                        }
                        continue;
                    }
                    Some(due - now)
                }
                None if queue.shutdown => break,
                None => None,
            };

            queue = match wait {
                Some(timeout) => match cvar.wait_timeout(queue, timeout) {
                    Ok((guard, _)) => guard,
                    Err(_) => return,
                },
                None => match cvar.wait(queue) {
                    Ok(guard) => guard,
                    Err(_) => return,
                },
            };
        }

        drop(queue);
        connection.close();
        debug!("MIDI dispatch thread finished");
    }

    impl Channel for MidiChannel {
        fn now(&self) -> f64 {
            self.epoch.elapsed().as_secs_f64()
        }

        fn start_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
            let msg = MidiMessage::note_on(self.channel, tone, strength)?;
            self.schedule(time, msg)
        }

        fn stop_note(&mut self, time: f64, tone: Tone, strength: f64) -> Result<()> {
            let msg = MidiMessage::note_off(self.channel, tone, strength)?;
            self.schedule(time, msg)
        }

        /// Drops everything still queued and sends CC 123 right away.
        fn all_notes_off(&mut self) -> Result<()> {
            {
                let (lock, _) = &*self.shared;
                let mut queue = lock
                    .lock()
                    .map_err(|_| MidiError::SendFailed("dispatch queue poisoned".to_string()))?;
                let dropped = queue.heap.len();
                queue.heap.clear();
                debug!(dropped, "all notes off");
            }
            self.schedule(0.0, MidiMessage::all_notes_off(self.channel))
        }

        fn release(&mut self) -> Result<()> {
            self.shut_down();
            Ok(())
        }
    }

    impl Drop for MidiChannel {
        fn drop(&mut self) {
            self.shut_down();
        }
    }
}
