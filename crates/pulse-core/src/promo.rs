//! Logic behind the landing page's promo widgets: the session countdown,
//! the stock scarcity number, the sticky call-to-action threshold and
//! in-page anchor links.
//!
//! Everything here is pure; the browser crate reads the clock, storage and
//! scroll position and writes the results into the DOM.

use std::fmt;

use crate::time::{Duration, Timestamp};

/// A fixed deadline that survives reloads within one browser session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    deadline: Timestamp,
}

impl Countdown {
    pub fn new(deadline: Timestamp) -> Self {
        Self { deadline }
    }

    /// Resume from a stored deadline, or start a fresh one `length` from
    /// `now`. The second value is `Some` when the caller must persist the new
    /// deadline.
    pub fn resume_or_start(
        stored: Option<&str>,
        now: Timestamp,
        length: Duration,
    ) -> (Self, Option<String>) {
        match stored.and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(ms) if ms.is_finite() => (Self::new(Timestamp::from_millis(ms)), None),
            _ => {
                let deadline = now + length;
                (Self::new(deadline), Some(format!("{}", deadline.as_millis() as i64)))
            }
        }
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn remaining(&self, now: Timestamp) -> Remaining {
        Remaining::from_duration(self.deadline.since(now))
    }
}

/// Time left on a countdown, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub fn from_duration(d: Duration) -> Self {
        let total = d.whole_seconds();
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// `[hours, minutes, seconds]`, each zero-padded to two digits.
    pub fn padded(&self) -> [String; 3] {
        [pad2(self.hours), pad2(self.minutes), pad2(self.seconds)]
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

fn pad2(n: u64) -> String {
    format!("{:02}", n)
}

/// Map a uniform sample in `[0, 1)` to a unit count in `[min, max]`.
pub fn stock_units(sample: f64, min: u32, max: u32) -> u32 {
    let (lo, hi) = (min.min(max), min.max(max));
    let span = (hi as u64 - lo as u64 + 1) as f64;
    let offset = (sample.clamp(0.0, 1.0) * span).floor() as u64;
    lo + offset.min((hi - lo) as u64) as u32
}

pub fn stock_label(units: u32) -> String {
    format!("{} unidades", units)
}

/// One-shot reveal of the sticky CTA once the page scrolls past a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyCta {
    threshold_px: f64,
    shown: bool,
}

impl StickyCta {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            shown: false,
        }
    }

    /// Returns `true` exactly once: on the first scroll past the threshold.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        if self.shown || scroll_y <= self.threshold_px {
            return false;
        }
        self.shown = true;
        true
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

/// Selector an in-page link scrolls to: its `href` when that is a fragment
/// like `#faq`. A bare `#` has no target.
pub fn anchor_target(href: &str) -> Option<&str> {
    let href = href.trim();
    (href.starts_with('#') && href.len() > 1).then_some(href)
}
