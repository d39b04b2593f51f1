/// Fixed-interval tick scheduler driven by caller-supplied timestamps.
///
/// Timestamps are milliseconds on any monotonic clock (`Instant` in the
/// terminal, `performance.now()` in the browser). A disarmed timer never
/// fires.
#[derive(Debug, Clone, Default)]
pub struct TickTimer {
    interval_ms: Option<u64>,
    last_fire_ms: f64,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next tick `interval_ms` after `now_ms`, replacing any
    /// pending deadline.
    pub fn arm(&mut self, now_ms: f64, interval_ms: u64) {
        self.interval_ms = Some(interval_ms);
        self.last_fire_ms = now_ms;
    }

    pub fn cancel(&mut self) {
        self.interval_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.interval_ms.is_some()
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    /// Returns true at most once per elapsed interval.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.interval_ms {
            Some(interval) if now_ms - self.last_fire_ms >= interval as f64 => {
                self.last_fire_ms = now_ms;
                true
            }
            _ => false,
        }
    }
}
