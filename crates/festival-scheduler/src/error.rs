//! Error types for festival-scheduler operations.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{MovieId, ShowtimeId, TheaterId};

/// Malformed caller input, rejected before the engine creates any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("showtime {showtime} starts at {start} which is not before its end {end}")]
    EmptyInterval {
        showtime: ShowtimeId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("showtime {showtime} references unknown movie {movie}")]
    UnknownMovie { showtime: ShowtimeId, movie: MovieId },

    #[error("movie {0} is not in the catalog")]
    MovieNotInCatalog(MovieId),

    #[error("showtime {showtime} references unknown theater {theater}")]
    UnknownTheater {
        showtime: ShowtimeId,
        theater: TheaterId,
    },

    #[error("movie {movie} references unknown showtime {showtime}")]
    UnknownShowtime {
        movie: MovieId,
        showtime: ShowtimeId,
    },

    #[error("movie {movie} lists showtime {showtime}, which belongs to movie {owner}")]
    ShowtimeMovieMismatch {
        movie: MovieId,
        showtime: ShowtimeId,
        owner: MovieId,
    },

    #[error("blackout hours must lie within 0..=24 (got {after}..{before})")]
    BlackoutHours { after: u32, before: u32 },
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// A caller-supplied filter or weight failed to evaluate.
    #[error("Rule '{rule}' failed: {message}")]
    Rule { rule: String, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleError {
    /// True for errors caused by malformed showtimes, ids, or option values.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScheduleError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
