use crate::aircraft::{Aircraft, AircraftId, AircraftStatus};
use crate::airport::{Airport, AirportId};
use crate::cache::TtlCache;
use crate::error::OpsError;
use crate::flight::{CabinCounts, CabinPrices, Flight, FlightId, FlightStatus};
use crate::route::Route;
use crate::time;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache key: one variant per query shape, parameters included, so the
/// bulk lookups coexist under one wholesale invalidation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Query {
    AllFlights,
    ForAircraft(AircraftId),
    Departures(AirportId, NaiveDate),
}

/// Everything needed to put a new flight on the board. Duration may be
/// omitted when a route (nominal time, or distance plus the assigned
/// aircraft's cruise speed) can supply it.
#[derive(Clone, Debug)]
pub struct FlightPlan {
    pub number: Arc<str>,
    pub origin_id: AirportId,
    pub destination_id: AirportId,
    pub aircraft_id: Option<AircraftId>,
    pub departure_time: NaiveDateTime,
    pub duration_minutes: Option<i64>,
    pub passengers: CabinCounts,
    pub prices: CabinPrices,
}

/// Outcome of one synchronization pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub flight_changes: Vec<(Arc<str>, FlightStatus, FlightStatus)>,
    pub aircraft_changes: Vec<(AircraftId, AircraftStatus, AircraftStatus)>,
    pub errors: Vec<OpsError>,
}

impl SyncReport {
    pub fn changed(&self) -> usize {
        self.flight_changes.len()
    }
}

pub struct Ops {
    pub aircraft: HashMap<AircraftId, Aircraft>,
    pub airports: HashMap<AirportId, Airport>,
    pub routes: HashMap<(AirportId, AirportId), Route>,
    pub flights: Vec<Flight>,
    flights_index: HashMap<FlightId, usize>,
    cache: TtlCache<Query, Vec<Flight>>,
    next_flight_id: FlightId,
    sync_running: AtomicBool,
}

impl Ops {
    pub fn new(
        aircraft: HashMap<AircraftId, Aircraft>,
        airports: HashMap<AirportId, Airport>,
        routes: HashMap<(AirportId, AirportId), Route>,
        mut flights: Vec<Flight>,
        cache_ttl: Duration,
    ) -> Ops {
        flights.sort_by_key(|f| f.departure_time);
        let flights_index = flights
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect::<HashMap<FlightId, usize>>();
        let next_flight_id = flights.iter().map(|f| f.id + 1).max().unwrap_or(1);
        Ops {
            aircraft,
            airports,
            routes,
            flights,
            flights_index,
            cache: TtlCache::new(cache_ttl),
            next_flight_id,
            sync_running: AtomicBool::new(false),
        }
    }

    pub fn load_from_file(path: &str, cache_ttl: Duration) -> Result<Self, OpsError> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            aircraft: Vec<Aircraft>,
            airports: Vec<Airport>,
            routes: Vec<Route>,
            flights: Vec<Flight>,
        }
        let raw: RawData = serde_json::from_str(&data)?;

        let ac_map = raw
            .aircraft
            .into_iter()
            .map(|a| (a.registration.clone(), a))
            .collect();

        let ap_map = raw
            .airports
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        let rt_map = raw
            .routes
            .into_iter()
            .map(|r| ((r.origin_id.clone(), r.destination_id.clone()), r))
            .collect();

        Ok(Ops::new(ac_map, ap_map, rt_map, raw.flights, cache_ttl))
    }

    fn rebuild_index(&mut self) {
        self.flights.sort_by_key(|f| f.departure_time);
        self.flights_index = self
            .flights
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();
    }

    // ---- cache-backed bulk queries ----

    pub fn all_flights(&self) -> Arc<Vec<Flight>> {
        self.cache
            .get_with(Query::AllFlights, || self.flights.clone())
    }

    pub fn flights_for_aircraft(&self, aircraft_id: &AircraftId) -> Arc<Vec<Flight>> {
        self.cache
            .get_with(Query::ForAircraft(aircraft_id.clone()), || {
                self.flights
                    .iter()
                    .filter(|f| f.aircraft_id.as_ref() == Some(aircraft_id))
                    .cloned()
                    .collect()
            })
    }

    pub fn departures(&self, airport_id: &AirportId, date: NaiveDate) -> Arc<Vec<Flight>> {
        self.cache
            .get_with(Query::Departures(airport_id.clone(), date), || {
                self.flights
                    .iter()
                    .filter(|f| f.origin_id == *airport_id && f.departure_time.date() == date)
                    .cloned()
                    .collect()
            })
    }

    // ---- conflict detection ----

    /// Decides whether `aircraft_id` can take a flight occupying `window`.
    ///
    /// Block times are closed intervals, so touching boundaries count as a
    /// conflict. For a brand-new flight (`exclude` is `None`) the aircraft's
    /// stored status must also be `Available`; an edit skips that gate so a
    /// flight already underway can still be moved without rejecting itself.
    /// The verdict is advisory and point-in-time; nothing is locked.
    pub fn is_available(
        &self,
        aircraft_id: &AircraftId,
        window: (NaiveDateTime, NaiveDateTime),
        exclude: Option<FlightId>,
    ) -> bool {
        let Some(aircraft) = self.aircraft.get(aircraft_id) else {
            warn!(aircraft = %aircraft_id, "availability check for unknown aircraft");
            return false;
        };

        for flight in self
            .flights_for_aircraft(aircraft_id)
            .iter()
            .filter(|f| Some(f.id) != exclude)
        {
            match flight.block_time() {
                Ok((start, end)) => {
                    if window.0 <= end && window.1 >= start {
                        return false;
                    }
                }
                Err(err) => {
                    warn!(flight = %flight.number, %err, "skipping flight with no block time");
                }
            }
        }

        exclude.is_some() || aircraft.status == AircraftStatus::Available
    }

    // ---- flight lifecycle ----

    fn derive_duration(&self, plan: &FlightPlan) -> Result<i64, OpsError> {
        if let Some(minutes) = plan.duration_minutes {
            if minutes <= 0 {
                return Err(OpsError::NonPositiveDuration);
            }
            return Ok(minutes);
        }
        let route = self
            .routes
            .get(&(plan.origin_id.clone(), plan.destination_id.clone()))
            .ok_or_else(|| {
                OpsError::UnknownRoute(plan.origin_id.clone(), plan.destination_id.clone())
            })?;
        if let Some(nominal) = route.nominal_minutes {
            if nominal <= 0 {
                return Err(OpsError::NonPositiveDuration);
            }
            return Ok(nominal);
        }
        let aircraft_id = plan
            .aircraft_id
            .as_ref()
            .ok_or_else(|| OpsError::MissingDuration(plan.number.clone()))?;
        let aircraft = self
            .aircraft
            .get(aircraft_id)
            .ok_or_else(|| OpsError::UnknownAircraft(aircraft_id.clone()))?;
        time::duration_from_speed(route.distance_km, aircraft.model.cruise_speed_kmh)
    }

    pub fn add_flight(&mut self, plan: FlightPlan) -> Result<FlightId, OpsError> {
        if plan.origin_id == plan.destination_id {
            return Err(OpsError::SameAirport);
        }
        for airport_id in [&plan.origin_id, &plan.destination_id] {
            if !self.airports.contains_key(airport_id) {
                return Err(OpsError::UnknownAirport(airport_id.clone()));
            }
        }
        if self.flights.iter().any(|f| f.number == plan.number) {
            return Err(OpsError::DuplicateFlightNumber(plan.number.clone()));
        }

        let duration = self.derive_duration(&plan)?;
        let flight = Flight {
            id: self.next_flight_id,
            number: plan.number,
            origin_id: plan.origin_id,
            destination_id: plan.destination_id,
            aircraft_id: plan.aircraft_id,
            departure_time: plan.departure_time,
            duration_minutes: Some(duration),
            status: FlightStatus::Scheduled,
            passengers: plan.passengers,
            prices: plan.prices,
        };

        if let Some(aircraft_id) = &flight.aircraft_id {
            if !self.aircraft.contains_key(aircraft_id) {
                return Err(OpsError::UnknownAircraft(aircraft_id.clone()));
            }
            let window = flight.block_time()?;
            if !self.is_available(aircraft_id, window, None) {
                return Err(OpsError::AircraftUnavailable(aircraft_id.clone()));
            }
        }

        let id = flight.id;
        let number = flight.number.clone();
        self.next_flight_id += 1;
        self.flights.push(flight);
        self.rebuild_index();
        self.cache.invalidate_all();
        info!(flight = %number, id, "flight added");

        self.assert_invariants();
        Ok(id)
    }

    /// Moves a flight's departure, re-validating its aircraft against the
    /// shifted block time. The flight's own prior interval is excluded so
    /// it does not conflict with itself.
    pub fn reschedule_flight(
        &mut self,
        number: &str,
        departure_time: NaiveDateTime,
    ) -> Result<(), OpsError> {
        let idx = self.find_by_number(number)?;

        let mut candidate = self.flights[idx].clone();
        candidate.departure_time = departure_time;
        if let Some(aircraft_id) = &candidate.aircraft_id {
            let window = candidate.block_time()?;
            if !self.is_available(aircraft_id, window, Some(candidate.id)) {
                return Err(OpsError::AircraftUnavailable(aircraft_id.clone()));
            }
        }

        self.flights[idx].departure_time = departure_time;
        self.rebuild_index();
        self.cache.invalidate_all();
        info!(flight = %number, departure = %departure_time, "flight rescheduled");

        self.assert_invariants();
        Ok(())
    }

    /// Puts a different aircraft on a flight, via the edit path of the
    /// availability check.
    pub fn assign_aircraft(
        &mut self,
        number: &str,
        aircraft_id: AircraftId,
    ) -> Result<(), OpsError> {
        let idx = self.find_by_number(number)?;
        if !self.aircraft.contains_key(&aircraft_id) {
            return Err(OpsError::UnknownAircraft(aircraft_id));
        }

        let window = self.flights[idx].block_time()?;
        let flight_id = self.flights[idx].id;
        if !self.is_available(&aircraft_id, window, Some(flight_id)) {
            return Err(OpsError::AircraftUnavailable(aircraft_id));
        }

        self.flights[idx].aircraft_id = Some(aircraft_id.clone());
        self.cache.invalidate_all();
        info!(flight = %number, aircraft = %aircraft_id, "aircraft assigned");

        self.assert_invariants();
        Ok(())
    }

    pub fn remove_flight(&mut self, number: &str) -> Result<(), OpsError> {
        let idx = self.find_by_number(number)?;
        if self.flights[idx].status != FlightStatus::Scheduled {
            return Err(OpsError::NotRemovable(self.flights[idx].number.clone()));
        }

        self.flights.remove(idx);
        self.rebuild_index();
        self.cache.invalidate_all();
        info!(flight = %number, "flight removed");

        self.assert_invariants();
        Ok(())
    }

    fn find_by_number(&self, number: &str) -> Result<usize, OpsError> {
        self.flights
            .iter()
            .position(|f| f.number.as_ref() == number)
            .ok_or_else(|| OpsError::UnknownFlight(Arc::from(number)))
    }

    // ---- status synchronization ----

    /// Recomputes every flight's status against a single `now` sample,
    /// reconciles every aircraft's projected status, and invalidates the
    /// cache once at the end. Per-item failures are logged and collected,
    /// never aborting the pass. A trigger arriving while a pass is already
    /// running no-ops instead of queueing.
    pub fn sync_status(&mut self, now: NaiveDateTime) -> SyncReport {
        if self
            .sync_running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("status sync already running, trigger dropped");
            return SyncReport::default();
        }

        let report = self.run_sync_pass(now);
        self.sync_running.store(false, Ordering::Release);
        report
    }

    fn run_sync_pass(&mut self, now: NaiveDateTime) -> SyncReport {
        let mut report = SyncReport::default();

        let snapshot = self.all_flights();
        for flight in snapshot.iter() {
            let arrival = match flight.arrival_time() {
                Ok(arrival) => arrival,
                Err(err) => {
                    warn!(flight = %flight.number, %err, "skipping flight in sync pass");
                    report.errors.push(err);
                    continue;
                }
            };

            let new_status = FlightStatus::at(now, flight.departure_time, arrival);
            let Some(idx) = self.flights_index.get(&flight.id).copied() else {
                // removed since the snapshot was taken
                continue;
            };
            let old_status = self.flights[idx].status;
            if new_status != old_status {
                self.flights[idx].status = new_status;
                info!(
                    flight = %flight.number,
                    old = %old_status,
                    new = %new_status,
                    "flight status changed"
                );
                report
                    .flight_changes
                    .push((flight.number.clone(), old_status, new_status));
            }
        }

        // Reconcile every aircraft, not only those whose flights changed,
        // so advisory manual overrides are also corrected here.
        let mut aircraft_ids = self.aircraft.keys().cloned().collect::<Vec<AircraftId>>();
        aircraft_ids.sort();
        for aircraft_id in aircraft_ids {
            let projected = AircraftStatus::project(
                self.flights
                    .iter()
                    .filter(|f| f.aircraft_id.as_ref() == Some(&aircraft_id))
                    .map(|f| f.status),
            );
            let Some(aircraft) = self.aircraft.get_mut(&aircraft_id) else {
                continue;
            };
            if aircraft.status != projected {
                let old = aircraft.status;
                aircraft.status = projected;
                info!(
                    aircraft = %aircraft_id,
                    old = %old,
                    new = %projected,
                    "aircraft status changed"
                );
                report
                    .aircraft_changes
                    .push((aircraft_id.clone(), old, projected));
            }
        }

        // one wholesale invalidation per pass, not one per entity
        self.cache.invalidate_all();

        self.assert_invariants();
        report
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        debug_assert!(
            self.flights
                .windows(2)
                .all(|fs| fs[0].departure_time <= fs[1].departure_time),
            "Flights sorted by departure invariant violated"
        );

        debug_assert!(
            self.flights
                .iter()
                .enumerate()
                .all(|(i, f)| self.flights_index.get(&f.id) == Some(&i)),
            "Flight index invariant violated"
        );

        debug_assert!(
            self.flights.iter().all(|f| {
                f.aircraft_id
                    .as_ref()
                    .map(|id| self.aircraft.contains_key(id))
                    .unwrap_or(true)
            }),
            "Assigned aircraft existence invariant violated"
        );

        debug_assert!(
            self.flights
                .iter()
                .all(|f| f.origin_id != f.destination_id),
            "Origin <-> destination distinctness invariant violated"
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}
