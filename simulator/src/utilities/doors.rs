//! ----- DOORS -----
//! Pending door-close events. Each one carries a token; a car only honours
//! the close whose token it still holds, so dropping the token on the car
//! cancels the event without touching the heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClose {
    due: Duration,
    token: u64,
    car: u8,
}

impl PartialOrd for PendingClose {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingClose {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so the max-heap pops the earliest deadline first
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.token.cmp(&self.token))
    }
}

#[derive(Debug, Default)]
pub struct DoorTimers {
    queue: BinaryHeap<PendingClose>,
    next_token: u64,
}

impl DoorTimers {
    pub fn new() -> Self {
        DoorTimers::default()
    }

    /// Schedules a close of `car`'s doors at `due` and returns its token.
    pub fn schedule(&mut self, car: u8, due: Duration) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.queue.push(PendingClose { due, token, car });
        token
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|pending| pending.due)
    }

    /// Removes and returns `(car, token)` of every close due at `now`, oldest first.
    pub fn pop_due(&mut self, now: Duration) -> Vec<(u8, u64)> {
        let mut due = Vec::new();
        while let Some(pending) = self.queue.peek() {
            if pending.due > now {
                break;
            }
            if let Some(pending) = self.queue.pop() {
                due.push((pending.car, pending.token));
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut timers = DoorTimers::new();
        let late = timers.schedule(1, ms(3500));
        let early = timers.schedule(2, ms(1500));
        assert_eq!(timers.next_deadline(), Some(ms(1500)));
        assert_eq!(timers.pop_due(ms(4000)), vec![(2, early), (1, late)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn leaves_future_events_queued() {
        let mut timers = DoorTimers::new();
        timers.schedule(1, ms(1500));
        let later = timers.schedule(3, ms(5000));
        assert_eq!(timers.pop_due(ms(2000)).len(), 1);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(ms(5000)), vec![(3, later)]);
    }

    #[test]
    fn tokens_are_unique() {
        let mut timers = DoorTimers::new();
        let a = timers.schedule(1, ms(10));
        let b = timers.schedule(1, ms(10));
        assert_ne!(a, b);
    }
}
