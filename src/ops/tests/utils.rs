use crate::aircraft::{Aircraft, AircraftId, AircraftStatus, AircraftType};
use crate::airport::{Airport, AirportId};
use crate::flight::{CabinCounts, CabinPrices, Flight, FlightId, FlightStatus};
use crate::ops::ops::Ops;
use crate::route::Route;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn t(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn add_airport(airports: &mut HashMap<AirportId, Airport>, airport_id: &str, name: &str) {
    airports.insert(
        id(airport_id),
        Airport {
            id: id(airport_id),
            name: id(name),
        },
    );
}

pub fn add_aircraft(
    aircraft: &mut HashMap<AircraftId, Aircraft>,
    registration: &str,
    cruise_speed_kmh: u32,
    location_id: &str,
    status: AircraftStatus,
) {
    aircraft.insert(
        id(registration),
        Aircraft {
            registration: id(registration),
            model: AircraftType {
                name: id("A320"),
                capacity: 180,
                cruise_speed_kmh,
                hourly_cost: 2500.0,
            },
            build_date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            status,
            location_id: id(location_id),
            operator: id("VISTULA AIR"),
        },
    );
}

pub fn add_route(
    routes: &mut HashMap<(AirportId, AirportId), Route>,
    origin_id: &str,
    destination_id: &str,
    distance_km: f64,
    nominal_minutes: Option<i64>,
) {
    routes.insert(
        (id(origin_id), id(destination_id)),
        Route {
            origin_id: id(origin_id),
            destination_id: id(destination_id),
            distance_km,
            nominal_minutes,
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn add_flight(
    flights: &mut Vec<Flight>,
    flight_id: FlightId,
    number: &str,
    origin_id: &str,
    destination_id: &str,
    departure_time: NaiveDateTime,
    duration_minutes: Option<i64>,
    aircraft_id: Option<&str>,
    status: FlightStatus,
) {
    flights.push(Flight {
        id: flight_id,
        number: id(number),
        origin_id: id(origin_id),
        destination_id: id(destination_id),
        aircraft_id: aircraft_id.map(id),
        departure_time,
        duration_minutes,
        status,
        passengers: CabinCounts::default(),
        prices: CabinPrices::default(),
    });
}

pub fn ops(
    aircraft: HashMap<AircraftId, Aircraft>,
    airports: HashMap<AirportId, Airport>,
    routes: HashMap<(AirportId, AirportId), Route>,
    flights: Vec<Flight>,
) -> Ops {
    Ops::new(aircraft, airports, routes, flights, Duration::from_secs(60))
}

/// A single-aircraft world with four airports and a KRK-WAW route, the
/// shared starting point for most suites.
pub fn base_world() -> (
    HashMap<AircraftId, Aircraft>,
    HashMap<AirportId, Airport>,
    HashMap<(AirportId, AirportId), Route>,
) {
    let mut aircraft = HashMap::new();
    let mut airports = HashMap::new();
    let mut routes = HashMap::new();

    add_airport(&mut airports, "KRK", "Krakow");
    add_airport(&mut airports, "WAW", "Warsaw");
    add_airport(&mut airports, "GDN", "Gdansk");
    add_airport(&mut airports, "WRO", "Wroclaw");

    add_aircraft(&mut aircraft, "SP-LVA", 828, "KRK", AircraftStatus::Available);

    add_route(&mut routes, "KRK", "WAW", 252.0, Some(45));
    add_route(&mut routes, "KRK", "GDN", 485.0, None);

    (aircraft, airports, routes)
}
