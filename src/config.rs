use core::time::Duration;

use crate::constants::DEFAULT_TIMEOUT_MS;

/// Configuration settings for the PMS5003 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound for one acquisition, from the first byte scanned to the
    /// last payload byte.
    pub timeout: Duration,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The time allowed for one acquisition.
    pub fn new(timeout: Duration) -> Config {
        Config { timeout }
    }

    /// Sets the acquisition timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The time allowed for one acquisition.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // Timeout in whole milliseconds, saturating for absurdly long durations.
    pub(crate) fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for Config {
    /// Returns the default configuration: a 5 second acquisition timeout.
    fn default() -> Config {
        Config {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}
