use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Non-negative time span, stored as fractional milliseconds to match the
/// browser's high-resolution clock.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    millis: f64,
}

impl Duration {
    pub fn from_millis(ms: f64) -> Self {
        Self {
            millis: if ms.is_finite() { ms.max(0.0) } else { 0.0 },
        }
    }

    pub fn from_seconds(s: f64) -> Self {
        Self::from_millis(s * 1000.0)
    }

    pub fn zero() -> Self {
        Self { millis: 0.0 }
    }

    /// Interval between updates at `rate` per second. A non-positive rate
    /// yields a zero interval (every tick is accepted).
    pub fn per_second(rate: f64) -> Self {
        if rate > 0.0 {
            Self::from_millis(1000.0 / rate)
        } else {
            Self::zero()
        }
    }

    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    pub fn as_seconds(&self) -> f64 {
        self.millis / 1000.0
    }

    /// Whole seconds, rounded down.
    pub fn whole_seconds(&self) -> u64 {
        (self.millis / 1000.0).floor() as u64
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis < 1000.0 {
            write!(f, "{:.0}ms", self.millis)
        } else {
            write!(f, "{:.2}s", self.as_seconds())
        }
    }
}

/// A point on a monotonic or wall clock, in milliseconds.
///
/// Animation ticks use `performance.now()`-style values; the countdown uses
/// epoch milliseconds. Both share this type since only differences matter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp {
    millis: f64,
}

impl Timestamp {
    pub fn from_millis(ms: f64) -> Self {
        Self { millis: ms }
    }

    pub fn zero() -> Self {
        Self { millis: 0.0 }
    }

    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Time elapsed since `earlier`; zero if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.millis - earlier.millis)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::zero()
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp::from_millis(self.millis + rhs.as_millis())
    }
}
