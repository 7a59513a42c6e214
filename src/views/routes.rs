use std::collections::HashMap;
use crate::data::types::{FlightRow, Snapshot};
use crate::views::types::RouteCount;

pub const MAX_ROUTES: usize = 10;
const PREFIX_LEN: usize = 3;
const UNKNOWN_PREFIX: &str = "UNK";

/// Simulated routes ("<country> ➝ <airline prefix>") ranked by frequency.
/// Ties keep the order in which the routes were first seen.
pub fn popular_routes(snapshot: &Snapshot) -> Vec<RouteCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<RouteCount> = Vec::new();

    for route in snapshot.rows.iter().filter_map(route_label) {
        match index.get(&route) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(route.clone(), counts.len());
                counts.push(RouteCount { route, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(MAX_ROUTES);
    counts
}

fn route_label(row: &FlightRow) -> Option<String> {
    let callsign = row.callsign.as_ref()?;
    let country = row.origin_country.as_ref()?;

    let prefix = callsign
        .prefix(PREFIX_LEN)
        .unwrap_or_else(|| UNKNOWN_PREFIX.to_string());

    Some(format!("{} ➝ {}", country, prefix))
}
