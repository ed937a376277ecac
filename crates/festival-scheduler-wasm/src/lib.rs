//! WASM bindings for festival-scheduler.
//!
//! Exposes schedule building and conflict detection to JavaScript via
//! `wasm-bindgen`. Showtimes and options cross the boundary as JSON strings:
//! showtimes as an object keyed by showtime id, options in the same shape
//! `ScheduleOptions` deserializes from.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p festival-scheduler-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/festival-scheduler-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/festival_scheduler_wasm.wasm
//! ```

use festival_scheduler::{Listing, ScheduleOptions, Scheduler, ShowtimeMap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON plumbing, kept free of JsValue so it runs under native tests
// ---------------------------------------------------------------------------

fn parse_showtimes(json: &str) -> Result<ShowtimeMap, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid showtimes JSON: {}", e))
}

fn parse_options(json: &str) -> Result<ScheduleOptions, String> {
    if json.trim().is_empty() {
        return Ok(ScheduleOptions::default());
    }
    ScheduleOptions::from_json(json).map_err(|e| format!("Invalid options JSON: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn schedule_json(showtimes_json: &str, options_json: &str, seed: u32) -> Result<String, String> {
    let showtimes = parse_showtimes(showtimes_json)?;
    let options = parse_options(options_json)?;
    let scheduler = Scheduler::from_options(&options).map_err(|e| e.to_string())?;

    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let schedule = scheduler
        .schedule(&showtimes, &mut rng)
        .map_err(|e| e.to_string())?;
    to_json(&schedule)
}

fn conflicts_json(showtimes_json: &str, transit_buffer_minutes: u32) -> Result<String, String> {
    let listings: Vec<Listing> = parse_showtimes(showtimes_json)?
        .into_iter()
        .map(|(id, showtime)| Listing::new(id, showtime))
        .collect();
    to_json(&festival_scheduler::find_conflicts(
        &listings,
        transit_buffer_minutes,
    ))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Pick one showtime per movie.
///
/// `showtimes_json` is an object mapping showtime ids to
/// `{movie, theater, start, end}` with naive local datetimes
/// (e.g., "2013-05-18T13:00:00"). `options_json` may be empty for the
/// defaults. The same `seed` always yields the same schedule.
///
/// Returns a JSON string `{scheduled: [...], unresolved: [...]}`.
#[wasm_bindgen(js_name = "buildSchedule")]
pub fn build_schedule(
    showtimes_json: &str,
    options_json: &str,
    seed: u32,
) -> Result<String, JsValue> {
    schedule_json(showtimes_json, options_json, seed).map_err(|e| JsValue::from_str(&e))
}

/// Find every conflicting pair of showtimes.
///
/// Returns a JSON array of `{a, b, kind, ...}` objects where `kind` is
/// `overlap` (with `minutes`) or `transit` (with `gap_minutes`).
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(showtimes_json: &str, transit_buffer_minutes: u32) -> Result<String, JsValue> {
    conflicts_json(showtimes_json, transit_buffer_minutes).map_err(|e| JsValue::from_str(&e))
}

/// The default scheduling options as JSON.
#[wasm_bindgen(js_name = "defaultOptions")]
pub fn default_options() -> Result<String, JsValue> {
    to_json(&ScheduleOptions::default()).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SHOWTIMES: &str = r#"{
        "10": {"movie": 1, "theater": 1, "start": "2013-05-18T13:00:00", "end": "2013-05-18T15:00:00"},
        "11": {"movie": 1, "theater": 2, "start": "2013-05-21T19:00:00", "end": "2013-05-21T21:00:00"},
        "20": {"movie": 2, "theater": 2, "start": "2013-05-18T14:00:00", "end": "2013-05-18T15:30:00"}
    }"#;

    #[test]
    fn schedule_with_default_options() {
        let json = schedule_json(SHOWTIMES, "", 7).unwrap();
        let schedule: Value = serde_json::from_str(&json).unwrap();

        let ids: Vec<u64> = schedule["scheduled"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![11, 20]);
        assert_eq!(schedule["unresolved"], Value::Array(vec![]));
    }

    #[test]
    fn schedule_with_options() {
        let json = schedule_json(SHOWTIMES, r#"{"disabled_theaters": [2]}"#, 7).unwrap();
        let schedule: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(schedule["scheduled"][0]["id"], 10);
        assert_eq!(schedule["unresolved"][0]["movie"], 2);
    }

    #[test]
    fn schedule_rejects_bad_input() {
        let err = schedule_json("[1, 2", "", 0).unwrap_err();
        assert!(err.starts_with("Invalid showtimes JSON"), "{err}");

        let err = schedule_json(SHOWTIMES, "{\"transit_buffer_minutes\": -1}", 0).unwrap_err();
        assert!(err.starts_with("Invalid options JSON"), "{err}");

        let inverted = r#"{"1": {"movie": 1, "theater": 1, "start": "2013-05-18T15:00:00", "end": "2013-05-18T13:00:00"}}"#;
        let err = schedule_json(inverted, "", 0).unwrap_err();
        assert!(err.contains("showtime 1"), "{err}");
    }

    #[test]
    fn conflicts_reports_overlap() {
        let json = conflicts_json(SHOWTIMES, 60).unwrap();
        let conflicts: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(conflicts.as_array().unwrap().len(), 1);
        assert_eq!(conflicts[0]["a"], 10);
        assert_eq!(conflicts[0]["b"], 20);
        assert_eq!(conflicts[0]["kind"], "overlap");
        assert_eq!(conflicts[0]["minutes"], 60);
    }

    #[test]
    fn default_options_round_trip() {
        let json = to_json(&ScheduleOptions::default()).unwrap();
        assert_eq!(parse_options(&json).unwrap(), ScheduleOptions::default());
    }
}
