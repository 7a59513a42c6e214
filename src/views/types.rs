use serde::{Deserialize, Serialize};
use crate::data::types::Callsign;

/// Aircraft with a full position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPosition {
    pub callsign: Callsign,
    pub origin_country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCount {
    pub route: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedBin {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyDemand {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub route: String,
    pub price: f64,
}
