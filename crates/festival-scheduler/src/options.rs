//! User-facing schedule options and their translation into filters and weights.
//!
//! Options deserialize from JSON with every field optional; missing fields
//! take the defaults below.
//!
//! ```
//! use festival_scheduler::options::ScheduleOptions;
//!
//! let opts = ScheduleOptions::from_json(r#"{"prefer_weekends": true}"#).unwrap();
//! assert_eq!(opts.transit_buffer_minutes, 60);
//! assert!(opts.avoid_weekdays.active);
//! assert_eq!(opts.weights().len(), 1);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::Filter;
use crate::model::TheaterId;
use crate::weight::Weight;

pub const DEFAULT_TRANSIT_BUFFER_MINUTES: u32 = 60;

/// Weekday hours to keep free (for example, working hours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidWeekdays {
    pub active: bool,
    pub after: u32,
    pub before: u32,
}

impl Default for AvoidWeekdays {
    fn default() -> Self {
        Self {
            active: true,
            after: 9,
            before: 18,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferTime {
    pub early: bool,
    pub late: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    pub prefer_weekends: bool,
    pub avoid_weekdays: AvoidWeekdays,
    pub transit_buffer_minutes: u32,
    pub prefer_time: PreferTime,
    /// Theaters the user will not travel to.
    pub disabled_theaters: BTreeSet<TheaterId>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            prefer_weekends: false,
            avoid_weekdays: AvoidWeekdays::default(),
            transit_buffer_minutes: DEFAULT_TRANSIT_BUFFER_MINUTES,
            prefer_time: PreferTime::default(),
            disabled_theaters: BTreeSet::new(),
        }
    }
}

impl ScheduleOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Filters implied by the options: the weekday blackout when active, then
    /// the theater exclusion when any theater is disabled.
    ///
    /// # Errors
    /// `InvalidInput::BlackoutHours` if the blackout hours exceed 24.
    pub fn filters(&self) -> Result<Vec<Filter>> {
        let mut filters = Vec::new();
        if self.avoid_weekdays.active {
            filters.push(Filter::weekday_blackout(
                self.avoid_weekdays.after,
                self.avoid_weekdays.before,
            )?);
        }
        if !self.disabled_theaters.is_empty() {
            filters.push(Filter::theaters(self.disabled_theaters.iter().copied()));
        }
        Ok(filters)
    }

    /// Weights implied by the options, in weekend, earlier, later order.
    pub fn weights(&self) -> Vec<Weight> {
        let mut weights = Vec::new();
        if self.prefer_weekends {
            weights.push(Weight::PreferWeekends);
        }
        if self.prefer_time.early {
            weights.push(Weight::PreferEarlier);
        }
        if self.prefer_time.late {
            weights.push(Weight::PreferLater);
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ScheduleOptions::default();
        assert_eq!(opts.transit_buffer_minutes, 60);
        assert_eq!(
            opts.filters().unwrap(),
            vec![Filter::WeekdayBlackout { after: 9, before: 18 }]
        );
        assert!(opts.weights().is_empty());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ScheduleOptions::from_json("{}").unwrap(), ScheduleOptions::default());
    }

    #[test]
    fn partial_nested_json_keeps_defaults() {
        let opts = ScheduleOptions::from_json(r#"{"avoid_weekdays": {"before": 17}}"#).unwrap();
        assert_eq!(
            opts.avoid_weekdays,
            AvoidWeekdays {
                active: true,
                after: 9,
                before: 17
            }
        );
    }

    #[test]
    fn all_toggles() {
        let opts = ScheduleOptions::from_json(
            r#"{
                "prefer_weekends": true,
                "avoid_weekdays": {"active": false},
                "transit_buffer_minutes": 15,
                "prefer_time": {"early": true, "late": true},
                "disabled_theaters": [4, 2]
            }"#,
        )
        .unwrap();

        assert_eq!(opts.transit_buffer_minutes, 15);
        assert_eq!(opts.filters().unwrap(), vec![Filter::theaters([2, 4])]);
        assert_eq!(
            opts.weights(),
            vec![Weight::PreferWeekends, Weight::PreferEarlier, Weight::PreferLater]
        );
    }

    #[test]
    fn bad_blackout_hours_surface_on_filters() {
        let opts = ScheduleOptions::from_json(r#"{"avoid_weekdays": {"after": 30}}"#).unwrap();
        assert!(opts.filters().unwrap_err().is_invalid_input());
    }

    #[test]
    fn malformed_json() {
        assert!(ScheduleOptions::from_json("{not json").is_err());
    }
}
