//! On-screen mode indicator.

use std::time::{Duration, Instant};

const HIDE_DELAY: Duration = Duration::from_secs(2);

const ON: &str = "SHREDDER: ON";
const RESTORED: &str = "SHREDDER: RESTORED";

#[derive(Debug)]
enum State {
    Hidden,
    On,
    Restored { hide_at: Instant },
}

/// Status box mirroring the session's transitions. Shows "SHREDDER: ON" for
/// as long as the session is active; after a stop it shows
/// "SHREDDER: RESTORED" and hides itself once the delay elapses, unless a
/// restart brings the active message back first. The host polls
/// [`Banner::visible`].
#[derive(Debug)]
pub struct Banner {
    state: State,
}

impl Banner {
    pub fn new() -> Self {
        Self {
            state: State::Hidden,
        }
    }

    /// Substitution was just activated.
    pub fn on_start(&mut self) {
        self.state = State::On;
    }

    /// Substitution was just deactivated; the message lingers briefly.
    pub fn on_stop(&mut self) {
        self.on_stop_at(Instant::now());
    }

    fn on_stop_at(&mut self, now: Instant) {
        self.state = State::Restored {
            hide_at: now + HIDE_DELAY,
        };
    }

    /// Currently visible text, if any.
    pub fn visible(&self) -> Option<&str> {
        self.visible_at(Instant::now())
    }

    fn visible_at(&self, now: Instant) -> Option<&str> {
        match &self.state {
            State::Hidden => None,
            State::On => Some(ON),
            State::Restored { hide_at } => {
                if now < *hide_at {
                    Some(RESTORED)
                } else {
                    None
                }
            }
        }
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new()
    }
}
