//! Showtimes and the shapes the engine hands back to callers.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};

pub type ShowtimeId = u32;
pub type MovieId = u32;
pub type TheaterId = u32;

/// One screening of a movie in a theater.
///
/// Times are festival wall-clock times; no timezone conversion is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    pub movie: MovieId,
    pub theater: TheaterId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Showtime {
    pub fn new(movie: MovieId, theater: TheaterId, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            movie,
            theater,
            start,
            end,
        }
    }

    /// Reject showtimes whose interval is empty or inverted.
    pub fn validate(&self, id: ShowtimeId) -> Result<()> {
        if self.start >= self.end {
            return Err(InvalidInput::EmptyInterval {
                showtime: id,
                start: self.start,
                end: self.end,
            }
            .into());
        }
        Ok(())
    }
}

/// Caller-owned showtimes keyed by id. Ascending id order is the engine's slot order.
pub type ShowtimeMap = BTreeMap<ShowtimeId, Showtime>;

/// A showtime together with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ShowtimeId,
    #[serde(flatten)]
    pub showtime: Showtime,
}

impl Listing {
    pub fn new(id: ShowtimeId, showtime: Showtime) -> Self {
        Self { id, showtime }
    }
}

/// A movie none of whose showtimes could be placed.
///
/// `showtimes` holds every showtime originally supplied for the movie,
/// including ones removed by filters, so callers can display the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedMovie {
    pub movie: MovieId,
    pub showtimes: Vec<Listing>,
}

/// Result of one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Chosen showtimes, ascending by showtime id.
    pub scheduled: Vec<Listing>,
    /// Movies with no chosen showtime, ascending by movie id.
    pub unresolved: Vec<UnresolvedMovie>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.unresolved.is_empty()
    }

    /// The chosen showtime for `movie`, if one was placed.
    pub fn showtime_for(&self, movie: MovieId) -> Option<&Listing> {
        self.scheduled.iter().find(|l| l.showtime.movie == movie)
    }

    pub fn unresolved_movies(&self) -> Vec<MovieId> {
        self.unresolved.iter().map(|u| u.movie).collect()
    }
}
