//! Property-based tests for the scheduling engine using proptest.
//!
//! These tests verify invariants that should hold for *any* set of showtimes,
//! not just the hand-built scenarios in `engine_tests.rs`.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use festival_scheduler::conflict::conflicts_with;
use festival_scheduler::index::HourIndex;
use festival_scheduler::time::{add_minutes, hour_range, minute_diff};
use festival_scheduler::{
    build_schedule, find_conflicts, is_conflict, min_values, Filter, Listing, Showtime,
    ShowtimeMap, Weight,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A festival-week timestamp on a quarter hour.
fn arb_time() -> impl Strategy<Value = NaiveDateTime> {
    (16u32..=27, 0u32..=23, prop_oneof![Just(0u32), Just(15), Just(30), Just(45)]).prop_map(
        |(day, hour, min)| {
            NaiveDate::from_ymd_opt(2013, 5, day)
                .unwrap()
                .and_hms_opt(hour, min, 0)
                .unwrap()
        },
    )
}

fn arb_showtime() -> impl Strategy<Value = Showtime> {
    (1u32..=6, 1u32..=3, arb_time(), 45i64..=200).prop_map(|(movie, theater, start, minutes)| {
        Showtime::new(movie, theater, start, start + Duration::minutes(minutes))
    })
}

fn arb_showtimes() -> impl Strategy<Value = ShowtimeMap> {
    prop::collection::vec(arb_showtime(), 0..24).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, showtime)| (id as u32, showtime))
            .collect()
    })
}

fn arb_weights() -> impl Strategy<Value = Vec<Weight>> {
    prop::collection::vec(
        prop_oneof![
            Just(Weight::PreferWeekends),
            Just(Weight::PreferLater),
            Just(Weight::PreferEarlier),
        ],
        0..3,
    )
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Time and conflict laws
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn is_conflict_is_symmetric(a in arb_showtime(), b in arb_showtime()) {
        prop_assert_eq!(
            is_conflict(a.start, a.end, b.start, b.end),
            is_conflict(b.start, b.end, a.start, a.end)
        );
    }

    #[test]
    fn hour_range_is_symmetric_and_zero_on_equal(a in arb_time(), b in arb_time()) {
        prop_assert_eq!(hour_range(a, b), hour_range(b, a));
        prop_assert_eq!(hour_range(a, a), 0);
        prop_assert!(hour_range(a, b) >= 0);
    }

    #[test]
    fn minute_diff_is_symmetric(a in arb_time(), b in arb_time()) {
        prop_assert_eq!(minute_diff(a, b), minute_diff(b, a));
        prop_assert!(minute_diff(a, b) >= 0);
    }

    #[test]
    fn min_values_returns_every_minimum(values in prop::collection::vec(0i64..5, 1..30)) {
        let result = min_values(values.clone(), |v| *v);
        let min = *values.iter().min().unwrap();
        prop_assert_eq!(result.min, Some(min));
        prop_assert_eq!(result.values.len(), values.iter().filter(|&&v| v == min).count());
    }
}

// ---------------------------------------------------------------------------
// Hour index
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn index_finds_every_conflict_a_pairwise_scan_finds(
        showtimes in arb_showtimes(),
        buffer in 0u32..=180,
    ) {
        let listings: Vec<Listing> = showtimes
            .into_iter()
            .map(|(id, showtime)| Listing::new(id, showtime))
            .collect();
        let index = HourIndex::build(&listings);
        let pad = i64::from(buffer);

        for (slot, listing) in listings.iter().enumerate() {
            let s = &listing.showtime;
            let indexed: BTreeSet<usize> = index
                .candidates(add_minutes(s.start, -pad), add_minutes(s.end, pad))
                .into_iter()
                .filter(|&other| other != slot && conflicts_with(s, &listings[other].showtime, buffer))
                .collect();
            let scanned: BTreeSet<usize> = (0..listings.len())
                .filter(|&other| other != slot && conflicts_with(s, &listings[other].showtime, buffer))
                .collect();
            prop_assert_eq!(indexed, scanned, "showtime {}", listing.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule invariants
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn scheduled_showtimes_never_conflict(
        showtimes in arb_showtimes(),
        weights in arb_weights(),
        buffer in 0u32..=120,
        seed in any::<u64>(),
    ) {
        let schedule = build_schedule(&showtimes, &[], &weights, buffer, &mut StdRng::seed_from_u64(seed)).unwrap();
        let conflicts = find_conflicts(&schedule.scheduled, buffer);
        prop_assert!(conflicts.is_empty(), "conflicting picks: {:?}", conflicts);
    }

    #[test]
    fn movies_partition_into_scheduled_and_unresolved(
        showtimes in arb_showtimes(),
        buffer in 0u32..=120,
        seed in any::<u64>(),
    ) {
        let schedule = build_schedule(&showtimes, &[], &[], buffer, &mut StdRng::seed_from_u64(seed)).unwrap();

        let all: BTreeSet<u32> = showtimes.values().map(|s| s.movie).collect();
        let scheduled: Vec<u32> = schedule.scheduled.iter().map(|l| l.showtime.movie).collect();
        let scheduled_set: BTreeSet<u32> = scheduled.iter().copied().collect();
        let unresolved: BTreeSet<u32> = schedule.unresolved.iter().map(|u| u.movie).collect();

        prop_assert_eq!(scheduled.len(), scheduled_set.len(), "a movie was scheduled twice");
        prop_assert!(scheduled_set.is_disjoint(&unresolved));
        let union: BTreeSet<u32> = scheduled_set.union(&unresolved).copied().collect();
        prop_assert_eq!(union, all);
    }

    #[test]
    fn unresolved_movies_carry_all_their_showtimes(
        showtimes in arb_showtimes(),
        seed in any::<u64>(),
    ) {
        let schedule = build_schedule(&showtimes, &[], &[], 60, &mut StdRng::seed_from_u64(seed)).unwrap();

        for movie in &schedule.unresolved {
            let expected: Vec<u32> = showtimes
                .iter()
                .filter(|(_, s)| s.movie == movie.movie)
                .map(|(&id, _)| id)
                .collect();
            let actual: Vec<u32> = movie.showtimes.iter().map(|l| l.id).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn filtered_showtimes_are_never_scheduled(
        showtimes in arb_showtimes(),
        disabled in 1u32..=3,
        seed in any::<u64>(),
    ) {
        let filters = [Filter::theaters([disabled]), Filter::weekday_blackout(9, 18).unwrap()];
        let schedule = build_schedule(&showtimes, &filters, &[], 60, &mut StdRng::seed_from_u64(seed)).unwrap();

        for listing in &schedule.scheduled {
            prop_assert!(filters.iter().all(|f| !f.matches(&listing.showtime)));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible(
        showtimes in arb_showtimes(),
        seed in any::<u64>(),
    ) {
        let a = build_schedule(&showtimes, &[], &[], 30, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = build_schedule(&showtimes, &[], &[], 30, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
