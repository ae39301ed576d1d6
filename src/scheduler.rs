//! Virtual-time delayed callbacks.
//!
//! Everything that happens "later" in a snowfall (the next wind gust, each
//! flake's expiry) is an entry in a [`TimerQueue`]. The queue never sleeps and
//! never spawns threads: the host advances it once per frame and the view
//! dispatches whatever became due, one entry at a time, on the caller's thread.
//!
//! Entries due at the same instant pop in the order they were scheduled.
//! A [`TimerMark`] taken before a drain keeps entries scheduled during that
//! drain for the next one, so a zero-delay re-arm cannot spin forever.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::particle::FlakeId;

/// Handle to a scheduled entry, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Point in the scheduling order, from [`TimerQueue::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerMark(u64);

/// Events scheduled by a snowfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowEvent {
    /// The wind scheduler fires.
    Gust,
    /// A flake's lifetime is over.
    Expire(FlakeId),
}

/// Deterministic queue of delayed events keyed by virtual time.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_seq: u64,
    entries: BTreeMap<(Duration, u64), E>,
    deadlines: HashMap<u64, Duration>,
}

/// The queue used by [`SnowView`](crate::SnowView).
pub type SnowTimers = TimerQueue<SnowEvent>;

impl<E> TimerQueue<E> {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedule `event` to become due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now + delay;
        self.entries.insert((deadline, seq), event);
        self.deadlines.insert(seq, deadline);
        TimerHandle(seq)
    }

    /// Cancel a pending entry.
    ///
    /// Returns `false` if the entry already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.entries.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    /// Whether `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Deadline of the earliest pending entry.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest entry due at or before `until`.
    ///
    /// Moves the clock forward to that entry's deadline, so anything it
    /// schedules is relative to the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, E)> {
        let (&(deadline, seq), _) = self.entries.iter().next()?;
        if deadline > until {
            return None;
        }
        self.take(deadline, seq)
    }

    /// Mark the current end of the scheduling order.
    #[inline]
    pub fn mark(&self) -> TimerMark {
        TimerMark(self.next_seq)
    }

    /// Like [`pop_due`](Self::pop_due), but skips entries scheduled at or
    /// after `mark`. They stay pending for a later drain.
    pub fn pop_due_before(&mut self, until: Duration, mark: TimerMark) -> Option<(TimerHandle, E)> {
        let (deadline, seq) = self
            .entries
            .range(..=(until, u64::MAX))
            .map(|(&key, _)| key)
            .find(|&(_, seq)| seq < mark.0)?;
        self.take(deadline, seq)
    }

    fn take(&mut self, deadline: Duration, seq: u64) -> Option<(TimerHandle, E)> {
        let event = self.entries.remove(&(deadline, seq))?;
        self.deadlines.remove(&seq);
        self.now = self.now.max(deadline);
        Some((TimerHandle(seq), event))
    }

    /// Move the clock to `time` without firing anything.
    ///
    /// Time never runs backwards; earlier values are ignored.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(300), "c");
        q.schedule(ms(100), "a");
        q.schedule(ms(200), "b");

        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(1000)).map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(q.now(), ms(300));
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(50), 1);
        q.schedule(ms(50), 2);
        q.schedule(ms(50), 3);
        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(50)).map(|(_, e)| e)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut q = TimerQueue::new();
        q.schedule(ms(500), ());
        assert!(q.pop_due(ms(499)).is_none());
        assert_eq!(q.next_deadline(), Some(ms(500)));
        assert!(q.pop_due(ms(500)).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(10), 'a');
        let b = q.schedule(ms(20), 'b');
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(!q.is_pending(a));
        assert!(q.is_pending(b));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(ms(100)), Some((b, 'b')));
        // Cancelling after it fired is a no-op
        assert!(!q.cancel(b));
    }

    #[test]
    fn test_schedule_relative_to_fire_time() {
        let mut q = TimerQueue::new();
        q.schedule(ms(100), 0);
        q.pop_due(ms(1000));
        let h = q.schedule(ms(100), 1);
        assert!(q.is_pending(h));
        assert_eq!(q.next_deadline(), Some(ms(200)));
    }

    #[test]
    fn test_entries_after_mark_wait() {
        let mut q = TimerQueue::new();
        q.schedule(ms(10), "old");
        let mark = q.mark();
        q.schedule(ms(0), "new");

        assert_eq!(q.pop_due_before(ms(50), mark).map(|(_, e)| e), Some("old"));
        // Rescheduled at the instant it fired, still held back
        q.schedule(ms(0), "again");
        assert!(q.pop_due_before(ms(50), mark).is_none());
        assert_eq!(q.len(), 2);

        let mark = q.mark();
        let order: Vec<_> =
            std::iter::from_fn(|| q.pop_due_before(ms(50), mark).map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["new", "again"]);
    }

    #[test]
    fn test_advance_never_goes_back() {
        let mut q: TimerQueue<()> = TimerQueue::new();
        q.advance_to(ms(40));
        q.advance_to(ms(10));
        assert_eq!(q.now(), ms(40));
    }
}
