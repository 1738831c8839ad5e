//! Deadline queue for timed effects
//!
//! Durations are expressed as "apply now, schedule the reversal at
//! now + duration". Reversals sit in a min-heap keyed by deadline and are
//! drained at the start of each tick, so no callback ever runs re-entrantly.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::registry::EntityId;

/// Something that happens when a deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Effect {
    /// Guardian shield wears off
    ShieldExpires,
    /// Trap spawning resumes
    JamExpires,
    /// Echolocation cooldown finished
    AbilityReady,
    /// An echolocated entity fades back into the murk
    RevealFades(EntityId),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Scheduled {
    deadline_us: u64,
    /// Insertion order breaks deadline ties
    seq: u64,
    effect: Effect,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline_us: u64, effect: Effect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled {
            deadline_us,
            seq,
            effect,
        }));
    }

    /// Pop the earliest effect whose deadline is at or before `now_us`
    pub fn pop_due(&mut self, now_us: u64) -> Option<Effect> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.deadline_us <= now_us => {
                self.heap.pop().map(|Reverse(s)| s.effect)
            }
            _ => None,
        }
    }

    /// All due effects in deadline order
    pub fn drain_due(&mut self, now_us: u64) -> Vec<Effect> {
        let mut due = Vec::new();
        while let Some(effect) = self.pop_due(now_us) {
            due.push(effect);
        }
        due
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(s)| s.deadline_us)
    }

    /// Cancel everything pending
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(6_000, Effect::JamExpires);
        timers.schedule(4_000, Effect::ShieldExpires);
        timers.schedule(5_000, Effect::AbilityReady);

        assert!(timers.drain_due(3_999).is_empty());
        assert_eq!(timers.drain_due(5_000), vec![Effect::ShieldExpires, Effect::AbilityReady]);
        assert_eq!(timers.next_deadline(), Some(6_000));
        assert_eq!(timers.pop_due(10_000), Some(Effect::JamExpires));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(100, Effect::RevealFades(EntityId(9)));
        timers.schedule(100, Effect::RevealFades(EntityId(2)));
        assert_eq!(
            timers.drain_due(100),
            vec![Effect::RevealFades(EntityId(9)), Effect::RevealFades(EntityId(2))]
        );
    }

    #[test]
    fn test_clear_cancels_pending() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, Effect::ShieldExpires);
        timers.clear();
        assert_eq!(timers.pop_due(u64::MAX), None);
    }
}
