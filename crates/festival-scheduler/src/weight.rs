//! Soft preferences used to break ties between a movie's conflict-free showtimes.
//!
//! Lower totals are preferred. Weights are summed once per showtime before
//! selection starts and do not change afterwards.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Showtime;
use crate::time::is_weekend_or_holiday;

/// Scores a showtime; lower is more preferred.
pub trait Preference: Send + Sync {
    fn name(&self) -> &str;

    fn weight(&self, showtime: &Showtime) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    /// 0 on Saturday, Sunday and May 27; 23 otherwise.
    PreferWeekends,
    /// `23 - start hour`.
    PreferLater,
    /// `start hour`.
    PreferEarlier,
}

impl Weight {
    pub fn score(&self, showtime: &Showtime) -> i64 {
        let hour = i64::from(showtime.start.hour());
        match self {
            Weight::PreferWeekends => {
                if is_weekend_or_holiday(showtime.start) {
                    0
                } else {
                    23
                }
            }
            Weight::PreferLater => 23 - hour,
            Weight::PreferEarlier => hour,
        }
    }
}

impl Preference for Weight {
    fn name(&self) -> &str {
        match self {
            Weight::PreferWeekends => "prefer_weekends",
            Weight::PreferLater => "prefer_later",
            Weight::PreferEarlier => "prefer_earlier",
        }
    }

    fn weight(&self, showtime: &Showtime) -> Result<i64> {
        Ok(self.score(showtime))
    }
}
