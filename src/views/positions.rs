use crate::data::types::{FlightRow, Snapshot};
use crate::views::types::FlightPosition;

/// Every row with a complete position fix, in upstream order
pub fn flight_positions(snapshot: &Snapshot) -> Vec<FlightPosition> {
    snapshot.rows
        .iter()
        .filter_map(to_position)
        .collect()
}

fn to_position(row: &FlightRow) -> Option<FlightPosition> {
    Some(FlightPosition {
        callsign: row.callsign.clone()?,
        origin_country: row.origin_country.clone()?,
        latitude: row.latitude?,
        longitude: row.longitude?,
        velocity: row.velocity?,
    })
}
