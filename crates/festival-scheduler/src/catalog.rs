//! The festival's movies, theaters and showtimes.
//!
//! A catalog is one JSON document:
//!
//! ```json
//! {
//!   "movies": [{"id": 1, "title": "Stoker", "director": "Park Chan-wook", "showtimes": [10, 11]}],
//!   "theaters": {"1": "Egyptian", "2": "Uptown"},
//!   "showtimes": {
//!     "10": {"movie": 1, "theater": 1, "start": "2013-05-18T13:00:00", "end": "2013-05-18T14:39:00"},
//!     "11": {"movie": 1, "theater": 2, "start": "2013-05-21T19:00:00", "end": "2013-05-21T20:39:00"}
//!   }
//! }
//! ```
//!
//! It resolves movie and theater ids and turns a selection of movies into the
//! showtime map the engine schedules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};
use crate::model::{MovieId, Showtime, ShowtimeId, ShowtimeMap, TheaterId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub showtimes: Vec<ShowtimeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub theaters: BTreeMap<TheaterId, String>,
    #[serde(default)]
    pub showtimes: ShowtimeMap,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn theater_name(&self, id: TheaterId) -> Option<&str> {
        self.theaters.get(&id).map(String::as_str)
    }

    pub fn movie_ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.id).collect()
    }

    pub fn theater_ids(&self) -> Vec<TheaterId> {
        self.theaters.keys().copied().collect()
    }

    /// Check every cross reference and every showtime interval.
    pub fn validate(&self) -> Result<()> {
        for (&id, showtime) in &self.showtimes {
            self.check_showtime(id, showtime)?;
        }
        for movie in &self.movies {
            for &id in &movie.showtimes {
                self.listed_showtime(movie.id, id)?;
            }
        }
        Ok(())
    }

    /// The showtimes of the given movies, ready for scheduling.
    ///
    /// # Errors
    /// `MovieNotInCatalog` for an unknown movie id; `UnknownShowtime`,
    /// `ShowtimeMovieMismatch`, `UnknownMovie`, `UnknownTheater` or
    /// `EmptyInterval` for a selected showtime that does not resolve.
    pub fn select(&self, movies: &[MovieId]) -> Result<ShowtimeMap> {
        let mut selected = ShowtimeMap::new();
        for &movie_id in movies {
            let movie = self
                .movie(movie_id)
                .ok_or(InvalidInput::MovieNotInCatalog(movie_id))?;
            for &id in &movie.showtimes {
                let showtime = self.listed_showtime(movie_id, id)?;
                self.check_showtime(id, showtime)?;
                selected.insert(id, showtime.clone());
            }
        }
        Ok(selected)
    }

    /// A showtime listed by `movie`, which must exist and name `movie` back.
    fn listed_showtime(&self, movie: MovieId, id: ShowtimeId) -> Result<&Showtime> {
        let showtime = self
            .showtimes
            .get(&id)
            .ok_or(InvalidInput::UnknownShowtime { movie, showtime: id })?;
        if showtime.movie != movie {
            return Err(InvalidInput::ShowtimeMovieMismatch {
                movie,
                showtime: id,
                owner: showtime.movie,
            }
            .into());
        }
        Ok(showtime)
    }

    fn check_showtime(&self, id: ShowtimeId, showtime: &Showtime) -> Result<()> {
        showtime.validate(id)?;
        if self.movie(showtime.movie).is_none() {
            return Err(InvalidInput::UnknownMovie {
                showtime: id,
                movie: showtime.movie,
            }
            .into());
        }
        if !self.theaters.contains_key(&showtime.theater) {
            return Err(InvalidInput::UnknownTheater {
                showtime: id,
                theater: showtime.theater,
            }
            .into());
        }
        Ok(())
    }
}
