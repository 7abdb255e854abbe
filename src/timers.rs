// timers.rs
//! One-shot timers on a virtual clock the host advances.

use std::time::Duration;

use crate::{deck::Deck, error::DeckError};

pub type TimerFn = dyn FnOnce(&mut Deck) -> Result<(), DeckError> + Send;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: Duration,
    run: Box<TimerFn>,
}

#[derive(Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, run: Box<TimerFn>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Timer {
            id,
            due: self.now + delay,
            run,
        });
        id
    }

    /// Drop a pending timer. Returns false when it already ran or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Remove the earliest timer due at or before `deadline`, moving the
    /// clock to its due time. Ties run in scheduling order.
    pub(crate) fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, Box<TimerFn>)> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.id))?;
        let t = self.pending.remove(pos);
        self.now = self.now.max(t.due);
        Some((t.id, t.run))
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Box<TimerFn> {
        Box::new(|_| Ok(()))
    }

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut t = Timers::new();
        let late = t.schedule(Duration::from_millis(50), noop());
        let a = t.schedule(Duration::from_millis(10), noop());
        let b = t.schedule(Duration::from_millis(10), noop());

        assert!(t.pop_due(Duration::from_millis(5)).is_none());
        assert_eq!(t.pop_due(Duration::from_millis(60)).map(|(id, _)| id), Some(a));
        assert_eq!(t.now(), Duration::from_millis(10));
        assert_eq!(t.pop_due(Duration::from_millis(60)).map(|(id, _)| id), Some(b));
        assert_eq!(t.pop_due(Duration::from_millis(60)).map(|(id, _)| id), Some(late));
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn cancel_removes_only_pending() {
        let mut t = Timers::new();
        let id = t.schedule(Duration::from_millis(1), noop());
        assert!(t.is_pending(id));
        assert!(t.cancel(id));
        assert!(!t.cancel(id));
        assert!(t.pop_due(Duration::from_secs(1)).is_none());
    }
}
