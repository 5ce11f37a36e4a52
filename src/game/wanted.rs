//! Wanted-level escalation and decay

use super::constants::{WANTED_DECAY_MS, WANTED_MAX, WANTED_POLICE_THRESHOLD};

/// A player's heat: 0 (clean) to 5, decaying one step per quiet window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WantedLevel {
    level: u8,
    /// Last escalation or decay step (unix ms)
    last_change_at: u64,
}

/// Result of an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    pub previous: u8,
    pub level: u8,
    /// Police dispatch should be evaluated for this player
    pub dispatch_police: bool,
}

impl Escalation {
    pub fn changed(&self) -> bool {
        self.previous != self.level
    }
}

impl WantedLevel {
    pub fn new(now: u64) -> Self {
        Self {
            level: 0,
            last_change_at: now,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_wanted(&self) -> bool {
        self.level > 0
    }

    /// Raise the level (capped at 5) and restart the decay window
    pub fn escalate(&mut self, amount: u8, now: u64) -> Escalation {
        let previous = self.level;
        self.level = self.level.saturating_add(amount).min(WANTED_MAX);
        self.last_change_at = now;

        Escalation {
            previous,
            level: self.level,
            dispatch_police: self.level >= WANTED_POLICE_THRESHOLD,
        }
    }

    /// Drop one level if a full window has passed without a new crime.
    /// Returns true if the level changed.
    pub fn decay(&mut self, now: u64) -> bool {
        if self.level == 0 || now.saturating_sub(self.last_change_at) <= WANTED_DECAY_MS {
            return false;
        }

        self.level -= 1;
        self.last_change_at = now;
        true
    }

    /// Clear the level unconditionally. Returns true if it was non-zero.
    pub fn reset(&mut self, now: u64) -> bool {
        let was_wanted = self.level > 0;
        self.level = 0;
        self.last_change_at = now;
        was_wanted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalate_caps_at_five() {
        let mut wanted = WantedLevel::new(0);
        wanted.escalate(4, 10);
        let esc = wanted.escalate(2, 20);
        assert_eq!(esc.previous, 4);
        assert_eq!(esc.level, 5);
        assert!(esc.changed());

        let esc = wanted.escalate(1, 30);
        assert!(!esc.changed());
        assert_eq!(wanted.level(), 5);
    }

    #[test]
    fn police_dispatch_from_level_two() {
        let mut wanted = WantedLevel::new(0);
        assert!(!wanted.escalate(1, 0).dispatch_police);
        assert!(wanted.escalate(1, 0).dispatch_police);
    }

    #[test]
    fn decays_one_step_per_window() {
        let mut wanted = WantedLevel::new(0);
        wanted.escalate(3, 1_000);

        assert!(!wanted.decay(1_000 + WANTED_DECAY_MS));
        assert!(wanted.decay(1_000 + WANTED_DECAY_MS + 1));
        assert_eq!(wanted.level(), 2);

        // Timer restarted by the decay step
        assert!(!wanted.decay(1_000 + WANTED_DECAY_MS + 2));
    }

    #[test]
    fn quiet_35_seconds_at_three_leaves_two() {
        let mut wanted = WantedLevel::new(0);
        wanted.escalate(3, 0);
        // Evaluated every tick like the simulation loop does
        let mut now = 0;
        while now <= 35_000 {
            wanted.decay(now);
            now += 16;
        }
        assert_eq!(wanted.level(), 2);
    }

    #[test]
    fn five_needs_five_windows() {
        let mut wanted = WantedLevel::new(0);
        wanted.escalate(5, 0);
        let mut now = 0;
        for expected in (0..5).rev() {
            now += WANTED_DECAY_MS + 1;
            assert!(wanted.decay(now));
            assert_eq!(wanted.level(), expected);
        }
        assert!(!wanted.decay(now + 10 * WANTED_DECAY_MS));
    }

    #[test]
    fn reset_ignores_decay_timing() {
        let mut wanted = WantedLevel::new(0);
        wanted.escalate(4, 100);
        assert!(wanted.reset(101));
        assert_eq!(wanted.level(), 0);
        assert!(!wanted.reset(102));
    }
}
