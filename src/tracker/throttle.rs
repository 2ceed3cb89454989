use std::time::{Duration, Instant};

/// Ограничение частоты записи геометрии в оконную систему.
/// Накопление смещений идёт на каждом событии, запись только раз в интервал.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// С последней записи прошло строго больше интервала
    pub fn ready(&self, last_commit: Instant, now: Instant) -> bool {
        now.saturating_duration_since(last_commit) > self.interval
    }
}
