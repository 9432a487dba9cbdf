use crate::airport::AirportId;
use crate::flight::FlightStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type AircraftId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftType {
    pub name: Arc<str>,
    pub capacity: u32,
    pub cruise_speed_kmh: u32,
    pub hourly_cost: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftStatus {
    Available,
    Scheduled,
    Flying,
}

impl AircraftStatus {
    /// Projects one aircraft status from the statuses of the flights
    /// assigned to it. Any ground-active or airborne flight wins over a
    /// merely scheduled one; an aircraft with only completed flights (or
    /// none at all) is available.
    pub fn project(flights: impl IntoIterator<Item = FlightStatus>) -> AircraftStatus {
        let mut projected = AircraftStatus::Available;
        for status in flights {
            match status {
                FlightStatus::Boarding
                | FlightStatus::Departed
                | FlightStatus::Flying
                | FlightStatus::Landed
                | FlightStatus::Deplaning => return AircraftStatus::Flying,
                FlightStatus::Scheduled => projected = AircraftStatus::Scheduled,
                FlightStatus::Completed => {}
            }
        }
        projected
    }
}

impl fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AircraftStatus::Available => "AVAILABLE",
            AircraftStatus::Scheduled => "SCHEDULED",
            AircraftStatus::Flying => "FLYING",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub registration: AircraftId,
    pub model: AircraftType,
    pub build_date: NaiveDate,
    pub status: AircraftStatus,
    pub location_id: AirportId,
    pub operator: Arc<str>,
}
