use crate::error::OpsError;
use chrono::{Duration, NaiveDateTime};

/// Minutes needed to cover `distance_km` at `cruise_speed_kmh`, rounded up
/// to a whole minute.
pub fn duration_from_speed(distance_km: f64, cruise_speed_kmh: u32) -> Result<i64, OpsError> {
    if cruise_speed_kmh == 0 {
        return Err(OpsError::NonPositiveCruiseSpeed);
    }
    if !(distance_km > 0.0) {
        return Err(OpsError::NonPositiveDuration);
    }
    Ok((distance_km * 60.0 / cruise_speed_kmh as f64).ceil() as i64)
}

pub fn arrival_time(departure: NaiveDateTime, duration_min: i64) -> NaiveDateTime {
    departure + Duration::minutes(duration_min)
}
