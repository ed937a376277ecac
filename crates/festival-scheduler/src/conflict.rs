//! Detect showtimes that cannot both be attended.
//!
//! Two showtimes conflict when their closed intervals intersect, or when they
//! are in different theaters and the gap between them is shorter than the
//! transit buffer. Showtimes in the same theater may be back to back no matter
//! how small the gap.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{Listing, Showtime, ShowtimeId};
use crate::time::minute_diff;

/// True iff the closed intervals `[a_start, a_end]` and `[b_start, b_end]` intersect.
pub fn is_conflict(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    (a_start <= b_start && a_end >= b_start) || (b_start <= a_start && b_end >= a_start)
}

/// True iff `a` and `b` are in different theaters and separated by fewer than
/// `buffer_minutes` minutes.
pub fn is_transit_conflict(a: &Showtime, b: &Showtime, buffer_minutes: u32) -> bool {
    if a.theater == b.theater {
        return false;
    }
    let buffer = i64::from(buffer_minutes);
    (b.end < a.start && minute_diff(b.end, a.start) < buffer)
        || (b.start > a.end && minute_diff(a.end, b.start) < buffer)
}

/// Overlap or insufficient transit time between `a` and `b`.
pub fn conflicts_with(a: &Showtime, b: &Showtime, buffer_minutes: u32) -> bool {
    is_conflict(a.start, a.end, b.start, b.end) || is_transit_conflict(a, b, buffer_minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictKind {
    /// The intervals intersect; `minutes` is the shared duration (0 when they only touch).
    Overlap { minutes: i64 },
    /// Different theaters with too little time to travel between them.
    Transit { gap_minutes: i64 },
}

/// A conflicting pair of showtimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub a: ShowtimeId,
    pub b: ShowtimeId,
    #[serde(flatten)]
    pub kind: ConflictKind,
}

/// Classify the conflict between `a` and `b`, if any.
pub fn classify(a: &Showtime, b: &Showtime, buffer_minutes: u32) -> Option<ConflictKind> {
    if is_conflict(a.start, a.end, b.start, b.end) {
        let overlap = a.end.min(b.end) - a.start.max(b.start);
        return Some(ConflictKind::Overlap {
            minutes: overlap.num_minutes(),
        });
    }
    if is_transit_conflict(a, b, buffer_minutes) {
        let gap = if b.end < a.start {
            minute_diff(b.end, a.start)
        } else {
            minute_diff(a.end, b.start)
        };
        return Some(ConflictKind::Transit { gap_minutes: gap });
    }
    None
}

/// Every conflicting pair in `listings`, with `a` preceding `b` in slice order.
///
/// Quadratic; meant for auditing a finished schedule or a small selection.
pub fn find_conflicts(listings: &[Listing], buffer_minutes: u32) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, a) in listings.iter().enumerate() {
        for b in &listings[i + 1..] {
            if let Some(kind) = classify(&a.showtime, &b.showtime, buffer_minutes) {
                conflicts.push(Conflict {
                    a: a.id,
                    b: b.id,
                    kind,
                });
            }
        }
    }
    conflicts
}
