use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Ledger-assigned acceptance time.
///
/// Wall-clock milliseconds since the Unix epoch. Timestamps are assigned by
/// the ledger at the moment an append is accepted, never by the caller, and
/// are monotonic non-decreasing across acceptance order. Every accepted
/// entry carries a strictly positive timestamp; [`Timestamp::zero`] exists
/// only as the comparison floor for an empty ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp with an explicit millisecond value.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(millis)
    }

    /// The zero timestamp. Never valid for an accepted entry.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns `true` for any timestamp a committed entry may carry.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The later of `self` and `other`. Used by the ledger to keep
    /// acceptance timestamps non-decreasing under clock regression.
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
