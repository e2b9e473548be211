//! Keyboard chord detection.
//!
//! Tracks which keys are currently held and fires when a configured chord
//! is complete. The caller decides what a completed chord means and whether
//! key events should reach the tracker at all (focus gating lives with the
//! host, not here).

use std::collections::HashSet;

/// Detects a set of keys held down together.
///
/// Key names are compared ASCII-case-insensitively. On completion the held
/// set is cleared, so the chord fires once per press and re-arms only after
/// its keys are pressed again.
#[derive(Debug)]
pub struct ChordTracker {
    chord: Vec<String>,
    down: HashSet<String>,
}

impl ChordTracker {
    pub fn new<I, S>(chord: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = chord
            .into_iter()
            .map(|key| key.into().to_ascii_lowercase())
            .collect();
        keys.sort();
        keys.dedup();
        Self {
            chord: keys,
            down: HashSet::new(),
        }
    }

    /// Record a key press. Returns true when this press completes the chord.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.chord.is_empty() {
            return false;
        }
        self.down.insert(key.to_ascii_lowercase());
        if self.chord.iter().all(|wanted| self.down.contains(wanted)) {
            self.down.clear();
            return true;
        }
        false
    }

    /// Record a key release.
    pub fn key_up(&mut self, key: &str) {
        self.down.remove(&key.to_ascii_lowercase());
    }

    /// Forget every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn reset(&mut self) {
        self.down.clear();
    }
}

impl Default for ChordTracker {
    fn default() -> Self {
        Self::new(["t", "r"])
    }
}
