//! Hour bucketing and minute arithmetic over festival wall-clock times.
//!
//! All helpers operate on [`NaiveDateTime`]. Hour buckets are identified by an
//! integer epoch-hour key (see [`epoch_hour`]) so they can be used as map keys
//! without formatting dates.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};

const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Truncate `t` to the start of its hour.
pub fn hour_floor(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(t.hour()))
}

/// Round `t` up to the next whole hour, or return it unchanged if it already is one.
pub fn hour_ceil(t: NaiveDateTime) -> NaiveDateTime {
    let floor = hour_floor(t);
    if t.minute() > 0 || t.second() > 0 || t.nanosecond() > 0 {
        floor + Duration::hours(1)
    } else {
        floor
    }
}

/// Number of hour buckets crossed between `t1` and `t2`, in either order.
///
/// `hour_range(t, t)` is 0; 15:33..17:00 crosses the 15:00 and 16:00 buckets.
pub fn hour_range(t1: NaiveDateTime, t2: NaiveDateTime) -> i64 {
    let low = hour_floor(t1.min(t2));
    let high = hour_ceil(t1.max(t2));
    (high - low).num_hours()
}

/// Yield the start of every hour bucket crossed by `start..end`.
pub fn enumerate_hours(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> impl Iterator<Item = NaiveDateTime> {
    let first = hour_floor(start);
    (0..hour_range(start, end)).map(move |i| first + Duration::hours(i))
}

/// Integer key for the hour bucket containing `t`.
pub fn epoch_hour(t: NaiveDateTime) -> i64 {
    hour_floor(t)
        .and_utc()
        .timestamp()
        .div_euclid(SECONDS_PER_HOUR)
}

pub fn add_minutes(t: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    t + Duration::minutes(minutes)
}

/// Whole minutes between `t1` and `t2`, regardless of their order.
///
/// Truncation keeps `minute_diff(a, b) < n` equivalent to the exact gap being
/// under `n` minutes for any integer `n`.
pub fn minute_diff(t1: NaiveDateTime, t2: NaiveDateTime) -> i64 {
    (t1 - t2).num_minutes().abs()
}

/// Saturday, Sunday, or May 27.
///
/// May 27 stands in for Memorial Day as a fixed date, not a computed holiday.
pub fn is_weekend_or_holiday(t: NaiveDateTime) -> bool {
    matches!(t.weekday(), Weekday::Sat | Weekday::Sun) || (t.month() == 5 && t.day() == 27)
}
