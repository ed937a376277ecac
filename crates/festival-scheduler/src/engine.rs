//! Greedy selection of one conflict-free showtime per movie.
//!
//! # Algorithm
//!
//! 1. Validate intervals, group showtimes by movie, build the [`HourIndex`].
//! 2. Sum weights per showtime; apply filters, removing every match.
//! 3. Count conflicts for every live showtime.
//! 4. While some live showtime has zero conflicts: among its movie's live
//!    zero-conflict showtimes keep the minimum-weight ones, pick one at random,
//!    mark it chosen, remove the movie's other showtimes, and recount.
//! 5. Movies with nothing chosen are reported unresolved.
//!
//! Each round retires a whole movie, so the loop runs at most once per movie.
//! The result is a greedy fixed point, not a globally optimal assignment.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use festival_scheduler::{Scheduler, Showtime, ShowtimeMap};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let day = NaiveDate::from_ymd_opt(2013, 5, 18).unwrap();
//! let mut showtimes = ShowtimeMap::new();
//! showtimes.insert(0, Showtime::new(1, 1, day.and_hms_opt(15, 0, 0).unwrap(), day.and_hms_opt(17, 0, 0).unwrap()));
//! showtimes.insert(1, Showtime::new(2, 2, day.and_hms_opt(13, 0, 0).unwrap(), day.and_hms_opt(14, 22, 0).unwrap()));
//!
//! let scheduler = Scheduler::new().with_transit_buffer(10);
//! let schedule = scheduler.schedule(&showtimes, &mut StdRng::seed_from_u64(1)).unwrap();
//! assert_eq!(schedule.scheduled.len(), 2);
//! assert!(schedule.unresolved.is_empty());
//! ```

use std::collections::BTreeMap;

use log::{debug, trace};
use rand::Rng;

use crate::catalog::Catalog;
use crate::conflict::conflicts_with;
use crate::error::{Result, ScheduleError};
use crate::filter::{Exclusion, Filter};
use crate::index::HourIndex;
use crate::model::{Listing, MovieId, Schedule, ShowtimeMap, UnresolvedMovie};
use crate::options::{ScheduleOptions, DEFAULT_TRANSIT_BUFFER_MINUTES};
use crate::time::add_minutes;
use crate::weight::{Preference, Weight};

/// Every element of a collection that achieves the minimum key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinValues<T, K> {
    /// `None` when the input was empty.
    pub min: Option<K>,
    /// All minimal elements, in input order.
    pub values: Vec<T>,
}

/// Collect every element of `values` whose `key` equals the minimum.
///
/// ```
/// use festival_scheduler::min_values;
///
/// let result = min_values([1, 2, 3, 1, 1, 5, 9], |v| *v);
/// assert_eq!(result.min, Some(1));
/// assert_eq!(result.values, vec![1, 1, 1]);
/// ```
pub fn min_values<T, K, I, F>(values: I, key: F) -> MinValues<T, K>
where
    I: IntoIterator<Item = T>,
    K: Ord + Copy,
    F: Fn(&T) -> K,
{
    let mut result = MinValues {
        min: None,
        values: Vec::new(),
    };
    for value in values {
        let k = key(&value);
        match result.min {
            Some(min) if k > min => {}
            Some(min) if k == min => result.values.push(value),
            _ => {
                result.min = Some(k);
                result.values.clear();
                result.values.push(value);
            }
        }
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Eligible,
    Chosen,
    Removed,
}

/// Per-call working state of one showtime.
#[derive(Debug, Clone, Copy)]
struct Slot {
    status: Status,
    weight: i64,
    conflicts: usize,
}

impl Slot {
    /// Still a candidate for selection.
    fn is_live(&self) -> bool {
        self.status == Status::Eligible
    }

    /// Blocks other showtimes: either a candidate or already chosen.
    fn occupies(&self) -> bool {
        self.status != Status::Removed
    }
}

/// Builds schedules from showtimes using a fixed set of rules.
///
/// A `Scheduler` holds no per-call state and can be shared across threads;
/// every call to [`Scheduler::schedule`] works on its own private state and
/// the random source it is handed.
pub struct Scheduler {
    filters: Vec<Box<dyn Exclusion>>,
    weights: Vec<Box<dyn Preference>>,
    transit_buffer_minutes: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("filters", &self.filters.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("weights", &self.weights.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("transit_buffer_minutes", &self.transit_buffer_minutes)
            .finish()
    }
}

impl Scheduler {
    /// No filters, no weights, 60-minute transit buffer.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            weights: Vec::new(),
            transit_buffer_minutes: DEFAULT_TRANSIT_BUFFER_MINUTES,
        }
    }

    /// Scheduler configured from user options.
    ///
    /// # Errors
    /// `InvalidInput::BlackoutHours` if the blackout hours are out of range.
    pub fn from_options(options: &ScheduleOptions) -> Result<Self> {
        let mut scheduler = Self::new().with_transit_buffer(options.transit_buffer_minutes);
        for filter in options.filters()? {
            scheduler = scheduler.with_filter(filter);
        }
        for weight in options.weights() {
            scheduler = scheduler.with_weight(weight);
        }
        Ok(scheduler)
    }

    pub fn with_transit_buffer(mut self, minutes: u32) -> Self {
        self.transit_buffer_minutes = minutes;
        self
    }

    pub fn with_filter(mut self, filter: impl Exclusion + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn with_weight(mut self, weight: impl Preference + 'static) -> Self {
        self.weights.push(Box::new(weight));
        self
    }

    pub fn transit_buffer_minutes(&self) -> u32 {
        self.transit_buffer_minutes
    }

    /// Schedule the showtimes of `movies` from `catalog`.
    pub fn schedule_catalog<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        movies: &[MovieId],
        rng: &mut R,
    ) -> Result<Schedule> {
        let showtimes = catalog.select(movies)?;
        self.schedule(&showtimes, rng)
    }

    /// Pick at most one showtime per movie so that no two picks conflict.
    ///
    /// Ties between equally weighted showtimes are broken with `rng`; the
    /// same seed and input give the same schedule.
    ///
    /// # Errors
    /// `InvalidInput::EmptyInterval` if any showtime has `start >= end`;
    /// `ScheduleError::Rule` if a filter or weight fails. In both cases no
    /// schedule is produced.
    pub fn schedule<R: Rng + ?Sized>(&self, showtimes: &ShowtimeMap, rng: &mut R) -> Result<Schedule> {
        for (&id, showtime) in showtimes {
            showtime.validate(id)?;
        }

        let listings: Vec<Listing> = showtimes
            .iter()
            .map(|(&id, showtime)| Listing::new(id, showtime.clone()))
            .collect();

        let mut movies: BTreeMap<MovieId, Vec<usize>> = BTreeMap::new();
        for (slot, listing) in listings.iter().enumerate() {
            movies.entry(listing.showtime.movie).or_default().push(slot);
        }
        let index = HourIndex::build(&listings);

        debug!(
            "scheduling {} showtimes across {} movies ({} hour buckets, transit buffer {} min)",
            listings.len(),
            movies.len(),
            index.len(),
            self.transit_buffer_minutes
        );

        let mut slots = self.initial_slots(&listings)?;
        self.count_conflicts(&listings, &index, &mut slots);

        let mut rounds = 0usize;
        while let Some(seed) = slots.iter().position(|s| s.is_live() && s.conflicts == 0) {
            let movie = listings[seed].showtime.movie;
            let siblings = movies.get(&movie).map(Vec::as_slice).unwrap_or(&[]);

            let candidates = siblings
                .iter()
                .copied()
                .filter(|&slot| slots[slot].is_live() && slots[slot].conflicts == 0);
            let best = min_values(candidates, |&slot| slots[slot].weight);
            let pick = best.values[rng.gen_range(0..best.values.len())];

            for &slot in siblings {
                slots[slot].status = Status::Removed;
            }
            slots[pick].status = Status::Chosen;
            rounds += 1;

            trace!(
                "round {}: movie {} -> showtime {} (weight {:?}, {} tied)",
                rounds,
                movie,
                listings[pick].id,
                best.min,
                best.values.len()
            );

            self.count_conflicts(&listings, &index, &mut slots);
        }

        let schedule = collect_schedule(&listings, &movies, &slots);
        debug!(
            "scheduled {} movies in {} rounds, {} unresolved",
            schedule.scheduled.len(),
            rounds,
            schedule.unresolved.len()
        );
        Ok(schedule)
    }

    /// Weights first, then filters; nothing escapes this call on error.
    fn initial_slots(&self, listings: &[Listing]) -> Result<Vec<Slot>> {
        let mut slots = Vec::with_capacity(listings.len());
        for listing in listings {
            let mut weight = 0i64;
            for rule in &self.weights {
                weight += rule.weight(&listing.showtime).map_err(|e| rule_error(rule.name(), e))?;
            }
            slots.push(Slot {
                status: Status::Eligible,
                weight,
                conflicts: 0,
            });
        }

        for rule in &self.filters {
            for (slot, listing) in listings.iter().enumerate() {
                if rule
                    .excludes(&listing.showtime)
                    .map_err(|e| rule_error(rule.name(), e))?
                {
                    slots[slot].status = Status::Removed;
                }
            }
        }
        Ok(slots)
    }

    /// Recount conflicts for every live slot against every occupying slot.
    fn count_conflicts(&self, listings: &[Listing], index: &HourIndex, slots: &mut [Slot]) {
        let buffer = self.transit_buffer_minutes;
        let pad = i64::from(buffer);
        for slot in 0..listings.len() {
            if !slots[slot].is_live() {
                continue;
            }
            let showtime = &listings[slot].showtime;
            let window = index.candidates(
                add_minutes(showtime.start, -pad),
                add_minutes(showtime.end, pad),
            );
            let conflicts = window
                .into_iter()
                .filter(|&other| other != slot && slots[other].occupies())
                .filter(|&other| conflicts_with(showtime, &listings[other].showtime, buffer))
                .count();
            slots[slot].conflicts = conflicts;
        }
    }
}

/// Wrap a failing caller rule, keeping errors that already name their rule.
fn rule_error(rule: &str, err: ScheduleError) -> ScheduleError {
    match err {
        ScheduleError::Rule { .. } => err,
        other => ScheduleError::Rule {
            rule: rule.to_string(),
            message: other.to_string(),
        },
    }
}

fn collect_schedule(
    listings: &[Listing],
    movies: &BTreeMap<MovieId, Vec<usize>>,
    slots: &[Slot],
) -> Schedule {
    let scheduled = listings
        .iter()
        .zip(slots)
        .filter(|(_, s)| s.status == Status::Chosen)
        .map(|(l, _)| l.clone())
        .collect();

    let unresolved = movies
        .iter()
        .filter(|(_, members)| members.iter().all(|&slot| slots[slot].status != Status::Chosen))
        .map(|(&movie, members)| UnresolvedMovie {
            movie,
            showtimes: members.iter().map(|&slot| listings[slot].clone()).collect(),
        })
        .collect();

    Schedule {
        scheduled,
        unresolved,
    }
}

/// One-shot scheduling with built-in rules.
///
/// Equivalent to a [`Scheduler`] carrying `filters`, `weights` and
/// `transit_buffer_minutes`.
pub fn build_schedule<R: Rng + ?Sized>(
    showtimes: &ShowtimeMap,
    filters: &[Filter],
    weights: &[Weight],
    transit_buffer_minutes: u32,
    rng: &mut R,
) -> Result<Schedule> {
    let mut scheduler = Scheduler::new().with_transit_buffer(transit_buffer_minutes);
    for filter in filters {
        scheduler = scheduler.with_filter(filter.clone());
    }
    for &weight in weights {
        scheduler = scheduler.with_weight(weight);
    }
    scheduler.schedule(showtimes, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_values_keeps_every_minimum() {
        let result = min_values([1, 2, 3, 1, 1, 5, 9], |v| *v);
        assert_eq!(result.min, Some(1));
        assert_eq!(result.values, vec![1, 1, 1]);

        let result = min_values([1, 2, 3], |v| *v);
        assert_eq!(result.values, vec![1]);
    }

    #[test]
    fn min_values_by_key_preserves_order() {
        let result = min_values(["bb", "a", "cc", "d"], |s| s.len());
        assert_eq!(result.min, Some(1));
        assert_eq!(result.values, vec!["a", "d"]);
    }

    #[test]
    fn min_values_of_nothing() {
        let result = min_values(Vec::<i64>::new(), |v| *v);
        assert_eq!(result.min, None);
        assert!(result.values.is_empty());
    }

    #[test]
    fn slot_states() {
        let mut slot = Slot {
            status: Status::Eligible,
            weight: 0,
            conflicts: 0,
        };
        assert!(slot.is_live() && slot.occupies());
        slot.status = Status::Chosen;
        assert!(!slot.is_live() && slot.occupies());
        slot.status = Status::Removed;
        assert!(!slot.is_live() && !slot.occupies());
    }

    #[test]
    fn rule_error_keeps_rule_errors() {
        let inner = ScheduleError::Rule {
            rule: "inner".into(),
            message: "boom".into(),
        };
        match rule_error("outer", inner) {
            ScheduleError::Rule { rule, .. } => assert_eq!(rule, "inner"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
