//! Jail countdowns, one per seat.

use serde::{Deserialize, Serialize};

use crate::engine::models::Seat;

/// Remaining forced turns per seat; 0 means free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JailTracker {
    turns: Vec<u8>,
}

impl JailTracker {
    pub fn new(seats: usize) -> Self {
        Self {
            turns: vec![0; seats],
        }
    }

    pub fn remaining(&self, seat: Seat) -> u8 {
        self.turns.get(seat).copied().unwrap_or(0)
    }

    pub fn is_jailed(&self, seat: Seat) -> bool {
        self.remaining(seat) > 0
    }

    /// Always resets to `turns`, whatever was left before.
    pub fn imprison(&mut self, seat: Seat, turns: u8) {
        if let Some(t) = self.turns.get_mut(seat) {
            *t = turns;
        }
    }

    pub fn release(&mut self, seat: Seat) {
        self.imprison(seat, 0);
    }

    /// End-of-turn countdown: every seat, not just the one whose turn ended.
    pub fn tick_all(&mut self) {
        for t in &mut self.turns {
            *t = t.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imprison_resets_counter() {
        let mut jail = JailTracker::new(4);
        jail.imprison(1, 3);
        jail.tick_all();
        assert_eq!(jail.remaining(1), 2);
        jail.imprison(1, 3);
        assert_eq!(jail.remaining(1), 3);
    }

    #[test]
    fn test_tick_all_floors_at_zero() {
        let mut jail = JailTracker::new(4);
        jail.imprison(0, 1);
        jail.imprison(2, 3);
        jail.tick_all();
        assert!(!jail.is_jailed(0));
        assert_eq!(jail.remaining(2), 2);
        jail.tick_all();
        jail.tick_all();
        jail.tick_all();
        assert_eq!(jail.remaining(0), 0);
        assert_eq!(jail.remaining(2), 0);
    }

    #[test]
    fn test_unknown_seat_is_free() {
        let mut jail = JailTracker::new(2);
        jail.imprison(7, 3);
        assert!(!jail.is_jailed(7));
    }
}
