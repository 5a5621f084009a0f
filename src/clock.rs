use crate::error::Error;

/// A monotonic millisecond time source.
///
/// The driver has no notion of platform time in `no_std`; hosts provide one
/// (a hardware timer, an RTOS tick counter, or [`StdClock`] with the `std`
/// feature).
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin. Must never go backwards.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// [`Clock`] backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// Absolute time budget of a single acquisition.
pub(crate) struct Deadline<'a, C: Clock> {
    clock: &'a C,
    started_at: u64,
    timeout_ms: u64,
}

impl<'a, C: Clock> Deadline<'a, C> {
    pub(crate) fn start(clock: &'a C, timeout_ms: u64) -> Self {
        Self {
            clock,
            started_at: clock.now_ms(),
            timeout_ms,
        }
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.started_at)
    }

    // Fails once strictly more than the timeout has elapsed since `start`.
    pub(crate) fn check(&self) -> Result<(), Error> {
        let elapsed = self.elapsed_ms();
        if elapsed > self.timeout_ms {
            log::debug!(
                "Acquisition deadline exceeded after {} ms (limit {} ms)",
                elapsed,
                self.timeout_ms
            );
            return Err(Error::Timeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StepClock;

    #[test]
    fn deadline_expires_strictly_after_timeout() {
        let clock = StepClock::new(10);
        let deadline = Deadline::start(&clock, 30);
        // start read 0; checks see 10, 20, 30, then 40
        assert_eq!(deadline.check(), Ok(()));
        assert_eq!(deadline.check(), Ok(()));
        assert_eq!(deadline.check(), Ok(()));
        assert_eq!(deadline.check(), Err(Error::Timeout));
    }

    #[test]
    fn elapsed_is_relative_to_start() {
        let clock = StepClock::starting_at(1_000, 5);
        let deadline = Deadline::start(&clock, 100);
        assert_eq!(deadline.elapsed_ms(), 5);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
