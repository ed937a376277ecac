//! # festival-scheduler
//!
//! Conflict-free showtime scheduling for film festivals.
//!
//! Given the showtimes of the movies a festival-goer wants to see, the engine
//! picks at most one screening per movie so that no two picks overlap and
//! screenings in different theaters leave enough time to travel between them.
//! Hard exclusions (weekday blackout hours, disabled theaters) and soft
//! preferences (weekends, earlier or later shows) shape the choice.
//!
//! The engine is a greedy heuristic: it commits conflict-free showtimes one
//! movie at a time until none remain, and reports the movies it could not place.
//!
//! ## Modules
//!
//! - [`time`] — hour flooring, ceiling, bucketing and minute arithmetic
//! - [`index`] — hour-bucket index for nearby-showtime lookups
//! - [`conflict`] — overlap and transit-time conflict detection
//! - [`filter`] — hard exclusions applied before selection
//! - [`weight`] — soft preferences used to break ties
//! - [`engine`] — the greedy selection loop
//! - [`catalog`] — festival movies, theaters and showtimes
//! - [`options`] — user toggles mapped to filters and weights
//! - [`model`] — showtimes and schedule output
//! - [`error`] — Error types

pub mod catalog;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod model;
pub mod options;
pub mod time;
pub mod weight;

pub use catalog::{Catalog, Movie};
pub use conflict::{find_conflicts, is_conflict, Conflict, ConflictKind};
pub use engine::{build_schedule, min_values, MinValues, Scheduler};
pub use error::{InvalidInput, ScheduleError};
pub use filter::{Exclusion, Filter};
pub use model::{
    Listing, MovieId, Schedule, Showtime, ShowtimeId, ShowtimeMap, TheaterId, UnresolvedMovie,
};
pub use options::ScheduleOptions;
pub use weight::{Preference, Weight};
