use crate::aircraft::AircraftId;
use crate::airport::AirportId;
use std::io;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("flight {0} has no duration and no route to derive one from")]
    MissingDuration(Arc<str>),
    #[error("no route between {0} and {1}")]
    UnknownRoute(AirportId, AirportId),
    #[error("unknown airport {0}")]
    UnknownAirport(AirportId),
    #[error("unknown aircraft {0}")]
    UnknownAircraft(AircraftId),
    #[error("unknown flight {0}")]
    UnknownFlight(Arc<str>),
    #[error("flight number {0} is already in use")]
    DuplicateFlightNumber(Arc<str>),
    #[error("origin and destination airports must differ")]
    SameAirport,
    #[error("flight duration must be positive")]
    NonPositiveDuration,
    #[error("cruise speed must be positive to derive a duration")]
    NonPositiveCruiseSpeed,
    #[error("aircraft {0} is not available in the requested window")]
    AircraftUnavailable(AircraftId),
    #[error("flight {0} can only be removed while still scheduled")]
    NotRemovable(Arc<str>),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed scenario file: {0}")]
    Scenario(#[from] serde_json::Error),
}
