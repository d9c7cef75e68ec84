//! Fixed-rate timer frame scheduler
//!
//! Fallback for hosts without a vsync hook. Every request gets a deadline one
//! interval after the scheduler's clock; frames fire in deadline order.
//!
//! The clock is virtual: [`TimerScheduler::advance_to`] moves it forward and
//! fires everything that came due, which keeps simulations deterministic.
//! [`TimerScheduler::run_until_idle`] drives the same clock in real time.

use slotmap::SlotMap;
use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::scheduler::{FrameCallback, FrameHandle, FrameScheduler};

/// Default frame interval (~60 Hz)
pub const DEFAULT_TIMER_INTERVAL: Duration = Duration::from_millis(16);

const MIN_TIMER_INTERVAL: Duration = Duration::from_millis(1);

struct TimerEntry {
    deadline: Duration,
    seq: u64,
    callback: FrameCallback,
}

/// Frame scheduler backed by a fixed-interval timer
pub struct TimerScheduler {
    interval: Duration,
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    timers: RefCell<SlotMap<FrameHandle, TimerEntry>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_TIMER_INTERVAL)
    }

    /// Create a timer scheduler with a custom interval (at least 1ms)
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_TIMER_INTERVAL),
            now: Cell::new(Duration::ZERO),
            next_seq: Cell::new(0),
            timers: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Create a timer scheduler ticking at `fps` frames per second
    pub fn from_fps(fps: u32) -> Self {
        let fps = fps.max(1);
        Self::with_interval(Duration::from_secs_f64(1.0 / fps as f64))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current value of the scheduler clock
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .borrow()
            .values()
            .map(|entry| (entry.deadline, entry.seq))
            .min()
            .map(|(deadline, _)| deadline)
    }

    /// Move the clock to `target`, firing every timer that comes due
    ///
    /// Timers fire in deadline order. While a timer runs the clock reads its
    /// deadline, so frames requested from inside a callback are due one
    /// interval later and fire within the same call if that is still before
    /// `target`. Returns the number of callbacks invoked.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;

        while let Some((handle, deadline)) = self.earliest_due(target) {
            let entry = self.timers.borrow_mut().remove(handle);
            if let Some(entry) = entry {
                self.now.set(deadline);
                (entry.callback)(deadline);
                fired += 1;
            }
        }

        if target > self.now.get() {
            self.now.set(target);
        }
        fired
    }

    /// Move the clock forward by `delta`
    pub fn advance_by(&self, delta: Duration) -> usize {
        self.advance_to(self.now.get() + delta)
    }

    /// Fire timers in real time until none remain
    ///
    /// Blocks the calling thread, sleeping between deadlines.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            let wait = deadline.saturating_sub(self.now.get());
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            fired += self.advance_to(deadline);
        }
        tracing::debug!("TimerScheduler: idle after {} callbacks", fired);
        fired
    }

    fn earliest_due(&self, target: Duration) -> Option<(FrameHandle, Duration)> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, entry)| entry.deadline <= target)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(handle, entry)| (handle, entry.deadline))
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for TimerScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let deadline = self.now.get() + self.interval;
        let handle = self.timers.borrow_mut().insert(TimerEntry {
            deadline,
            seq,
            callback,
        });
        tracing::trace!("TimerScheduler: frame {:?} due at {:?}", handle, deadline);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if self.timers.borrow_mut().remove(handle).is_some() {
            tracing::trace!("TimerScheduler: cancelled frame {:?}", handle);
        }
    }

    fn name(&self) -> &'static str {
        "timer"
    }

    fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn reschedule_forever(scheduler: &Rc<TimerScheduler>, log: &Rc<RefCell<Vec<Duration>>>) {
        let s = scheduler.clone();
        let l = log.clone();
        scheduler.request_frame(Box::new(move |t| {
            l.borrow_mut().push(t);
            reschedule_forever(&s, &l);
        }));
    }

    #[test]
    fn test_interval_clamped() {
        assert_eq!(
            TimerScheduler::with_interval(Duration::ZERO).interval(),
            Duration::from_millis(1)
        );
        assert_eq!(TimerScheduler::new().interval(), DEFAULT_TIMER_INTERVAL);
    }

    #[test]
    fn test_fires_at_deadline() {
        let timer = TimerScheduler::new();
        let fired = Rc::new(Cell::new(None));
        let f = fired.clone();
        timer.request_frame(Box::new(move |t| f.set(Some(t))));

        assert_eq!(timer.advance_to(Duration::from_millis(15)), 0);
        assert_eq!(timer.advance_to(Duration::from_millis(16)), 1);
        assert_eq!(fired.get(), Some(Duration::from_millis(16)));
        assert_eq!(timer.pending_count(), 0);
    }

    #[test]
    fn test_rescheduling_fires_each_interval() {
        let timer = Rc::new(TimerScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        reschedule_forever(&timer, &log);

        assert_eq!(timer.advance_to(Duration::from_millis(100)), 6);
        let expected: Vec<_> = (1..=6).map(|i| Duration::from_millis(16 * i)).collect();
        assert_eq!(*log.borrow(), expected);
        assert_eq!(timer.next_deadline(), Some(Duration::from_millis(112)));
    }

    #[test]
    fn test_cancel_before_deadline() {
        let timer = TimerScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let handle = timer.request_frame(Box::new(move |_| f.set(true)));
        timer.cancel_frame(handle);

        timer.advance_by(Duration::from_secs(1));
        assert!(!fired.get());
    }

    #[test]
    fn test_same_deadline_fires_in_request_order() {
        let timer = TimerScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let o = order.clone();
            timer.request_frame(Box::new(move |_| o.borrow_mut().push(i)));
        }
        timer.advance_by(DEFAULT_TIMER_INTERVAL);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
