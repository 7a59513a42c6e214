use chrono::Timelike;
use crate::data::types::Snapshot;
use crate::views::types::HourlyDemand;

const HOURS_PER_DAY: usize = 24;

/// Position reports per UTC hour of day, all 24 hours listed.
///
/// A snapshot without a single timestamp yields an empty list rather than 24
/// zero entries.
pub fn high_demand_times(snapshot: &Snapshot) -> Vec<HourlyDemand> {
    let mut counts = [0usize; HOURS_PER_DAY];
    let mut observed = 0;

    for ts in snapshot.rows.iter().filter_map(|r| r.time_position) {
        counts[ts.hour() as usize] += 1;
        observed += 1;
    }

    if observed == 0 {
        return vec![];
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourlyDemand { hour: hour as u32, count })
        .collect()
}
