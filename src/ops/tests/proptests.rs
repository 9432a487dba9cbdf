use crate::flight::{Flight, FlightStatus};
use crate::ops::tests::utils::{add_flight, base_world, id, ops};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn minute(m: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::minutes(m)
}

fn flight_at(dep: i64, dur: i64, aircraft: Option<&str>) -> Flight {
    let mut flights = Vec::new();
    add_flight(
        &mut flights,
        1,
        "FO100",
        "KRK",
        "WAW",
        minute(dep),
        Some(dur),
        aircraft,
        FlightStatus::Scheduled,
    );
    flights.pop().unwrap()
}

proptest! {
    #[test]
    fn test_status_never_moves_backwards(
        dep in 0..5000i64,
        dur in 1..2000i64,
        n1 in -6000..12000i64,
        n2 in -6000..12000i64,
    ) {
        let departure = minute(dep);
        let arrival = minute(dep + dur);
        let (earlier, later) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };

        prop_assert!(
            FlightStatus::at(minute(earlier), departure, arrival)
                <= FlightStatus::at(minute(later), departure, arrival),
            "status regressed between {} and {}",
            minute(earlier),
            minute(later)
        );
    }

    #[test]
    fn test_block_time_monotonic_in_departure(
        dep in 1000..5000i64,
        dur in 1..2000i64,
        delta in 1..500i64,
    ) {
        let (start, end) = flight_at(dep, dur, None).block_time().unwrap();
        let (start2, end2) = flight_at(dep + delta, dur, None).block_time().unwrap();

        prop_assert!(start2 > start);
        prop_assert!(end2 > end);
        prop_assert_eq!(start2 - start, Duration::minutes(delta));
    }

    #[test]
    fn test_block_time_monotonic_in_duration(
        dep in 1000..5000i64,
        dur in 1..2000i64,
        delta in 1..500i64,
    ) {
        let (start, end) = flight_at(dep, dur, None).block_time().unwrap();
        let (start2, end2) = flight_at(dep, dur + delta, None).block_time().unwrap();

        prop_assert_eq!(start2, start);
        prop_assert!(end2 > end);
    }

    #[test]
    fn test_conflict_is_order_independent(
        dep_a in 1000..4000i64,
        dur_a in 10..500i64,
        dep_b in 1000..4000i64,
        dur_b in 10..500i64,
    ) {
        let flight_a = flight_at(dep_a, dur_a, None);
        let flight_b = flight_at(dep_b, dur_b, None);
        let window_a = flight_a.block_time().unwrap();
        let window_b = flight_b.block_time().unwrap();

        let (aircraft, airports, routes) = base_world();
        let mut flights = Vec::new();
        add_flight(
            &mut flights,
            1,
            "FO100",
            "KRK",
            "WAW",
            minute(dep_a),
            Some(dur_a),
            Some("SP-LVA"),
            FlightStatus::Scheduled,
        );
        let with_a = ops(aircraft, airports, routes, flights);

        let (aircraft, airports, routes) = base_world();
        let mut flights = Vec::new();
        add_flight(
            &mut flights,
            1,
            "FO200",
            "KRK",
            "WAW",
            minute(dep_b),
            Some(dur_b),
            Some("SP-LVA"),
            FlightStatus::Scheduled,
        );
        let with_b = ops(aircraft, airports, routes, flights);

        prop_assert_eq!(
            with_a.is_available(&id("SP-LVA"), window_b, None),
            with_b.is_available(&id("SP-LVA"), window_a, None),
            "verdict depended on which flight was already on the board"
        );
    }
}
