use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places every derived reading is rounded to.
pub const READING_SCALE: u32 = 2;

/// A stored snapshot of one decaying quantity: the value it had when it was
/// last written and the instant of that write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub value: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Level {
    pub fn new(value: Decimal, updated_at: DateTime<Utc>) -> Self {
        Self { value, updated_at }
    }

    /// A zero level stamped at `now`.
    pub fn zero(now: DateTime<Utc>) -> Self {
        Self::new(Decimal::ZERO, now)
    }

    /// Unclamped projection of the snapshot to `now`, moving `per_second`
    /// for every whole second elapsed since the last write.
    pub fn drifted(&self, per_second: Decimal, now: DateTime<Utc>) -> Decimal {
        let seconds = Decimal::from(elapsed_whole_seconds(self.updated_at, now));
        self.value.saturating_add(per_second.saturating_mul(seconds))
    }

    /// Overwrite the snapshot.
    pub fn reset(&mut self, value: Decimal, now: DateTime<Utc>) {
        self.value = value;
        self.updated_at = now;
    }
}

/// Whole seconds between `since` and `now`, floored and never negative.
///
/// Partial seconds are dropped on purpose: a reading only moves once a full
/// second has passed since the snapshot.
pub fn elapsed_whole_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - since).num_seconds();
    if seconds < 0 {
        log::warn!("snapshot at {since} is ahead of now ({now}); treating as no time elapsed");
        return 0;
    }
    seconds
}

/// Round a clamped reading to the public scale.
pub fn round_reading(value: Decimal) -> Decimal {
    value.round_dp(READING_SCALE)
}
