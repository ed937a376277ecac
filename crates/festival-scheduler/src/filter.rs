//! Hard exclusions applied once before selection.
//!
//! A filter answers "must this showtime be dropped?". Any match removes the
//! showtime for the rest of the run. Built-in rules are variants of [`Filter`];
//! callers with other needs implement [`Exclusion`] directly.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};
use crate::model::{Showtime, TheaterId};
use crate::time::is_weekend_or_holiday;

/// A predicate that permanently excludes showtimes.
pub trait Exclusion: Send + Sync {
    /// Short label used in logs and error messages.
    fn name(&self) -> &str;

    /// `Ok(true)` when `showtime` must not be scheduled.
    fn excludes(&self, showtime: &Showtime) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Drop weekday showtimes starting in `[after:00, before:00)`.
    /// Weekends and May 27 are never blacked out.
    WeekdayBlackout { after: u32, before: u32 },
    /// Drop showtimes in any of these theaters.
    Theaters { theaters: BTreeSet<TheaterId> },
}

impl Filter {
    /// Weekday blackout over `[after:00, before:00)`; both hours must be at most 24.
    ///
    /// An empty or inverted range is accepted and excludes nothing.
    pub fn weekday_blackout(after: u32, before: u32) -> Result<Self> {
        if after > 24 || before > 24 {
            return Err(InvalidInput::BlackoutHours { after, before }.into());
        }
        Ok(Filter::WeekdayBlackout { after, before })
    }

    pub fn theaters(theaters: impl IntoIterator<Item = TheaterId>) -> Self {
        Filter::Theaters {
            theaters: theaters.into_iter().collect(),
        }
    }

    /// Evaluate the built-in rule. Built-ins cannot fail.
    pub fn matches(&self, showtime: &Showtime) -> bool {
        match self {
            Filter::WeekdayBlackout { after, before } => {
                if is_weekend_or_holiday(showtime.start) {
                    return false;
                }
                let since_midnight = showtime.start.time() - NaiveTime::MIN;
                since_midnight >= Duration::hours(i64::from(*after))
                    && since_midnight < Duration::hours(i64::from(*before))
            }
            Filter::Theaters { theaters } => theaters.contains(&showtime.theater),
        }
    }
}

impl Exclusion for Filter {
    fn name(&self) -> &str {
        match self {
            Filter::WeekdayBlackout { .. } => "weekday_blackout",
            Filter::Theaters { .. } => "theaters",
        }
    }

    fn excludes(&self, showtime: &Showtime) -> Result<bool> {
        Ok(self.matches(showtime))
    }
}
