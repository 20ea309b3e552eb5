//! Scoped channel ownership.

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::{Channel, ChannelError};

/// Holds a channel for the duration of a piece of work.
///
/// Closing the session sends `all_notes_off` and then `release`. Call
/// [`Session::finish`] to see failures; a session that is simply dropped
/// (early return, `?`, panic) closes itself and logs them instead.
pub struct Session<C: Channel> {
    channel: C,
    closed: bool,
}

impl<C: Channel> Session<C> {
    pub fn new(channel: C) -> Self {
        debug!("channel session opened");
        Session {
            channel,
            closed: false,
        }
    }

    /// Close the session, reporting the first failure.
    pub fn finish(mut self) -> crate::Result<()> {
        self.close()
    }

    fn close(&mut self) -> crate::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let off = self.channel.all_notes_off();
        let released = self.channel.release();
        debug!("channel session closed");
        off.and(released)
    }
}

impl<C: Channel> Deref for Session<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.channel
    }
}

impl<C: Channel> DerefMut for Session<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

impl<C: Channel> Drop for Session<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to close channel session: {}", e);
        }
    }
}

/// Run `f` against `channel` inside a session.
///
/// The session is finished on success; on error (or panic) it is closed
/// by its drop, and `f`'s error wins over any close failure.
pub fn with_session<C, T, E, F>(channel: C, f: F) -> Result<T, E>
where
    C: Channel,
    E: From<ChannelError>,
    F: FnOnce(&mut C) -> Result<T, E>,
{
    let mut session = Session::new(channel);
    let value = f(&mut session)?;
    session.finish()?;
    Ok(value)
}
