use chrono::{DateTime, Utc};

/// Wall-clock source for expiry checks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// `Utc::now()`; backed by `Date.now()` in the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
