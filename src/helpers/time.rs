use chrono::Utc;

/// Source of the current wall-clock time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        now_i64()
    }
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}
