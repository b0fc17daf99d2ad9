// Real-time step scheduler

/// Converts the free-running millisecond counter into a rate-limited
/// decision to perform exactly one program step.
///
/// The scheduler polls the counter by compare-and-snapshot: each time the
/// reading changes, an interval countdown drops by one, so a burst of
/// ticks between polls coalesces into a single decrement rather than
/// queueing up steps. At zero the countdown reloads to `1000 / speed`
/// milliseconds and one step attempt fires.
#[derive(Debug, Clone)]
pub struct Scheduler {
    enabled: bool,
    interval_ms: u16,
    countdown_ms: u16,
    prev_ticks: u16,
}

impl Scheduler {
    pub fn new() -> Self {
        // speed 1 until the settings record is applied
        Scheduler {
            enabled: false,
            interval_ms: 1000,
            countdown_ms: 1000,
            prev_ticks: u16::MAX,
        }
    }

    /// Recompute the interval for a clock speed in instructions per
    /// second, restarting the countdown. Zero is ignored.
    pub fn set_speed(&mut self, ips: u8) {
        if ips == 0 {
            return;
        }
        self.interval_ms = 1000 / u16::from(ips);
        self.countdown_ms = self.interval_ms;
    }

    /// Restart the countdown at the full interval.
    pub fn reload(&mut self) {
        self.countdown_ms = self.interval_ms;
    }

    /// Enable stepping, starting a fresh interval.
    pub fn start(&mut self) {
        self.countdown_ms = self.interval_ms;
        self.enabled = true;
    }

    /// Disable stepping until the next start.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn is_running(&self) -> bool {
        self.enabled
    }

    /// Observe the tick counter. Returns true when one step attempt
    /// should be performed now.
    pub fn poll(&mut self, now: u16) -> bool {
        if now == self.prev_ticks {
            return false;
        }
        self.prev_ticks = now;

        if !self.enabled {
            return false;
        }

        self.countdown_ms -= 1;
        if self.countdown_ms != 0 {
            return false;
        }
        self.countdown_ms = self.interval_ms;
        true
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
