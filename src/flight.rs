use crate::aircraft::AircraftId;
use crate::airport::AirportId;
use crate::error::OpsError;
use crate::time;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Internal identity, assigned at creation. The business identity is the
/// surface-unique `number`.
pub type FlightId = u32;

/// Buffer before departure during which the aircraft is already occupied.
pub const BOARDING_LEAD_MIN: i64 = 30;
/// Buffer after arrival during which the aircraft is still occupied.
pub const DEBOARD_TRAIL_MIN: i64 = 20;

/// Lifecycle states in strict forward order, terminal last; the derived
/// ordering matches the progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Flying,
    Landed,
    Deplaning,
    Completed,
}

impl FlightStatus {
    /// Maps wall-clock time onto the flight lifecycle. Total over its
    /// inputs and free of I/O; callers must reject flights with
    /// `arrival <= departure` before calling.
    pub fn at(now: NaiveDateTime, departure: NaiveDateTime, arrival: NaiveDateTime) -> FlightStatus {
        if now > arrival + Duration::minutes(15) {
            FlightStatus::Completed
        } else if now >= arrival {
            FlightStatus::Deplaning
        } else if now >= arrival - Duration::minutes(10) {
            FlightStatus::Landed
        } else if now > departure + Duration::minutes(10) {
            FlightStatus::Flying
        } else if now >= departure {
            FlightStatus::Departed
        } else if now >= departure - Duration::minutes(30) {
            FlightStatus::Boarding
        } else {
            FlightStatus::Scheduled
        }
    }

    /// A completed flight no longer occupies its aircraft.
    pub fn is_terminal(&self) -> bool {
        *self == FlightStatus::Completed
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightStatus::Scheduled => "SCHEDULED",
            FlightStatus::Boarding => "BOARDING",
            FlightStatus::Departed => "DEPARTED",
            FlightStatus::Flying => "FLYING",
            FlightStatus::Landed => "LANDED",
            FlightStatus::Deplaning => "DEPLANING",
            FlightStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CabinCounts {
    pub economy: u32,
    pub business: u32,
    pub first: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CabinPrices {
    pub economy: f64,
    pub business: f64,
    pub first: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub number: Arc<str>,
    pub origin_id: AirportId,
    pub destination_id: AirportId,
    pub aircraft_id: Option<AircraftId>,
    pub departure_time: NaiveDateTime,
    pub duration_minutes: Option<i64>,
    pub status: FlightStatus,
    #[serde(default)]
    pub passengers: CabinCounts,
    #[serde(default)]
    pub prices: CabinPrices,
}

impl Flight {
    pub fn arrival_time(&self) -> Result<NaiveDateTime, OpsError> {
        let minutes = self
            .duration_minutes
            .ok_or_else(|| OpsError::MissingDuration(self.number.clone()))?;
        Ok(time::arrival_time(self.departure_time, minutes))
    }

    /// Inclusive interval during which the aircraft is occupied by this
    /// flight, boarding lead and deboarding trail included.
    pub fn block_time(&self) -> Result<(NaiveDateTime, NaiveDateTime), OpsError> {
        let arrival = self.arrival_time()?;
        Ok((
            self.departure_time - Duration::minutes(BOARDING_LEAD_MIN),
            arrival + Duration::minutes(DEBOARD_TRAIL_MIN),
        ))
    }
}
