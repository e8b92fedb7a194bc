//! Single-slot tick timer
//!
//! Holds at most one pending tick. Every schedule stamps a new `TickHandle`;
//! scheduling or cancelling invalidates the previous handle, so a superseded
//! tick can never be delivered. Time only moves through `advance`, which keeps
//! the engine single-threaded and lets hosts drive it from their own loop.

use std::time::Duration;

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTick {
    handle: TickHandle,
    remaining: Duration,
}

#[derive(Debug, Default)]
pub struct TickTimer {
    pending: Option<PendingTick>,
    generation: u64,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick `after` from now, replacing any pending one.
    pub fn schedule(&mut self, after: Duration) -> TickHandle {
        self.cancel();
        self.generation += 1;
        let handle = TickHandle(self.generation);
        self.pending = Some(PendingTick { handle, remaining: after });
        handle
    }

    /// Drop the pending tick, returning its handle.
    pub fn cancel(&mut self) -> Option<TickHandle> {
        self.pending.take().map(|pending| pending.handle)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending.map(|pending| pending.handle)
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.remaining)
    }

    /// Feed elapsed time.
    ///
    /// When the pending tick comes due it is removed and returned together with
    /// the time left over past its deadline. At most one tick fires per call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<(TickHandle, Duration)> {
        let pending = self.pending.as_mut()?;
        if elapsed < pending.remaining {
            pending.remaining -= elapsed;
            return None;
        }
        let leftover = elapsed - pending.remaining;
        let handle = pending.handle;
        self.pending = None;
        Some((handle, leftover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_once_when_due() {
        let mut timer = TickTimer::new();
        let handle = timer.schedule(ms(100));

        assert_eq!(timer.advance(ms(60)), None);
        assert_eq!(timer.time_until_due(), Some(ms(40)));
        assert_eq!(timer.advance(ms(50)), Some((handle, ms(10))));
        assert!(!timer.is_pending());
        assert_eq!(timer.advance(ms(500)), None);
    }

    #[test]
    fn test_reschedule_supersedes_previous_handle() {
        let mut timer = TickTimer::new();
        let first = timer.schedule(ms(100));
        let second = timer.schedule(ms(100));

        assert_ne!(first, second);
        assert_eq!(timer.pending(), Some(second));
        let (fired, _) = timer.advance(ms(100)).unwrap();
        assert_eq!(fired, second);
    }

    #[test]
    fn test_cancel_prevents_delivery() {
        let mut timer = TickTimer::new();
        let handle = timer.schedule(ms(10));
        assert_eq!(timer.cancel(), Some(handle));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.advance(ms(1000)), None);
    }

    #[test]
    fn test_zero_delay_fires_immediately() {
        let mut timer = TickTimer::new();
        let handle = timer.schedule(Duration::ZERO);
        assert_eq!(timer.advance(Duration::ZERO), Some((handle, Duration::ZERO)));
    }
}
