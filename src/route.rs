use crate::airport::AirportId;
use serde::{Deserialize, Serialize};

/// A serviced connection between two airports. `nominal_minutes` is the
/// published flight time at a reference speed; when absent, duration is
/// derived from `distance_km` and the assigned aircraft's cruise speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin_id: AirportId,
    pub destination_id: AirportId,
    pub distance_km: f64,
    pub nominal_minutes: Option<i64>,
}
