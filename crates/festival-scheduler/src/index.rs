//! Hour-bucket index for narrowing conflict checks to nearby showtimes.
//!
//! Each showtime is registered under every hour it spans. A window query
//! unions the buckets it touches, returning a superset of the showtimes that
//! could conflict; the exact predicate in [`crate::conflict`] decides.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::model::Listing;
use crate::time::{enumerate_hours, epoch_hour};

/// Epoch-hour key to the slots (indices into the listing slice) spanning that hour.
#[derive(Debug, Clone, Default)]
pub struct HourIndex {
    buckets: BTreeMap<i64, Vec<usize>>,
}

impl HourIndex {
    /// Index `listings` by slot position.
    pub fn build(listings: &[Listing]) -> Self {
        let mut buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (slot, listing) in listings.iter().enumerate() {
            for hour in enumerate_hours(listing.showtime.start, listing.showtime.end) {
                buckets.entry(epoch_hour(hour)).or_default().push(slot);
            }
        }
        Self { buckets }
    }

    /// Slots registered under the hour bucket `key`.
    pub fn bucket(&self, key: i64) -> &[usize] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty hour buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every slot that may touch the closed window `[lo, hi]`, deduplicated.
    ///
    /// A showtime ending exactly on the hour is registered only up to the
    /// previous bucket, so the scan starts one bucket before `lo`'s. Only
    /// occupied buckets are visited, however wide the window.
    pub fn candidates(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> BTreeSet<usize> {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let first = epoch_hour(lo) - 1;
        let last = epoch_hour(hi);
        self.buckets
            .range(first..=last)
            .flat_map(|(_, slots)| slots.iter().copied())
            .collect()
    }
}
