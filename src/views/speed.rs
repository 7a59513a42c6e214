use crate::data::types::Snapshot;
use crate::views::types::SpeedBin;

pub const BIN_COUNT: usize = 10;

/// Significant fractional digits in bin labels before disambiguation
const LABEL_PRECISION: i32 = 3;

/// Fraction of the observed range the lowest edge is pushed down by
const EDGE_ADJUST: f64 = 0.001;

/// Histogram of ground speeds over ten equal-width, right-closed bins spanning
/// the observed range. Only non-empty bins are returned, lowest first.
pub fn speed_distribution(snapshot: &Snapshot) -> Vec<SpeedBin> {
    let speeds: Vec<f64> = snapshot.rows.iter().filter_map(|r| r.velocity).collect();

    let Some(edges) = bin_edges(&speeds, BIN_COUNT) else {
        return vec![];
    };

    let mut counts = vec![0usize; BIN_COUNT];
    for &speed in &speeds {
        counts[bin_index(&edges, speed)] += 1;
    }

    let labels = edge_labels(&edges);

    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(i, &count)| SpeedBin {
            range: format!("({}, {}]", labels[i], labels[i + 1]),
            count,
        })
        .collect()
}

/// `bins + 1` edges. The lowest edge sits just below the minimum so it falls
/// inside the first right-closed bin; a zero-width range is widened on both sides.
fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }

    let (mut min, mut max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        let widen = |v: f64| if v == 0.0 { EDGE_ADJUST } else { EDGE_ADJUST * v.abs() };
        min -= widen(min);
        max += widen(max);
        Some(linspace(min, max, bins + 1))
    } else {
        let mut edges = linspace(min, max, bins + 1);
        edges[0] -= (max - min) * EDGE_ADJUST;
        Some(edges)
    }
}

fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let step = (stop - start) / (num - 1) as f64;
    let mut points: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
    // Pin the end exactly so the maximum always lands in the last bin
    points[num - 1] = stop;
    points
}

/// Index of the right-closed bin `(edges[i], edges[i + 1]]` holding `value`
fn bin_index(edges: &[f64], value: f64) -> usize {
    let bins = edges.len() - 1;
    edges[1..]
        .iter()
        .position(|&upper| upper >= value)
        .unwrap_or(bins - 1)
}

/// Rounded edge labels, with precision raised until no two edges print alike
fn edge_labels(edges: &[f64]) -> Vec<String> {
    let precision = (LABEL_PRECISION..20)
        .find(|&p| all_distinct(&round_all(edges, p)))
        .unwrap_or(LABEL_PRECISION);

    round_all(edges, precision)
        .into_iter()
        .map(python_float)
        .collect()
}

fn round_all(edges: &[f64], precision: i32) -> Vec<f64> {
    edges.iter().map(|&e| round_frac(e, precision)).collect()
}

fn all_distinct(values: &[f64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.windows(2).all(|w| w[0] != w[1])
}

/// Round to `precision` fractional digits, or to `precision` significant
/// digits when the integer part is zero
fn round_frac(x: f64, precision: i32) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }

    let digits = if x.trunc() == 0.0 {
        -(x.fract().abs().log10().floor() as i32) - 1 + precision
    } else {
        precision
    };

    round_half_even(x, digits)
}

fn round_half_even(x: f64, digits: i32) -> f64 {
    if digits >= 0 {
        let scale = 10f64.powi(digits);
        (x * scale).round_ties_even() / scale
    } else {
        let scale = 10f64.powi(-digits);
        (x / scale).round_ties_even() * scale
    }
}

/// Shortest round-trip rendering with a trailing `.0` on integral values and
/// exponent notation outside [1e-4, 1e16)
fn python_float(x: f64) -> String {
    if !x.is_finite() {
        return if x.is_nan() { "nan".to_string() } else if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", x);
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => sci,
        };
    }

    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::FlightRow;

    fn snapshot_of(speeds: &[Option<f64>]) -> Snapshot {
        Snapshot::new(
            speeds
                .iter()
                .map(|&velocity| FlightRow { velocity, ..FlightRow::default() })
                .collect(),
        )
    }

    fn pairs(bins: Vec<SpeedBin>) -> Vec<(String, usize)> {
        bins.into_iter().map(|b| (b.range, b.count)).collect()
    }

    #[test]
    fn test_whole_number_bins() {
        let bins = speed_distribution(&snapshot_of(&[Some(0.0), Some(10.0), None, Some(100.0)]));

        assert_eq!(
            pairs(bins),
            vec![
                ("(-0.1, 10.0]".to_string(), 2),
                ("(90.0, 100.0]".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_fractional_labels() {
        let bins = speed_distribution(&snapshot_of(&[Some(0.0), Some(0.5)]));

        assert_eq!(
            pairs(bins),
            vec![
                ("(-0.0005, 0.05]".to_string(), 1),
                ("(0.45, 0.5]".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_counts_sum_and_no_empty_bins() {
        let speeds: Vec<Option<f64>> = (0..200)
            .map(|i| if i % 9 == 0 { None } else { Some((i * 37 % 311) as f64 + 0.25) })
            .collect();
        let expected = speeds.iter().filter(|s| s.is_some()).count();

        let bins = speed_distribution(&snapshot_of(&speeds));

        assert!(!bins.is_empty() && bins.len() <= BIN_COUNT);
        assert!(bins.iter().all(|b| b.count > 0));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), expected);
    }

    #[test]
    fn test_identical_speeds_share_one_bin() {
        let bins = speed_distribution(&snapshot_of(&[Some(50.0), Some(50.0), Some(50.0)]));

        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_narrow_range_gets_distinct_labels() {
        let bins = speed_distribution(&snapshot_of(&[Some(1000.0001), Some(1000.0002)]));

        assert_eq!(bins.len(), 2);
        assert_ne!(bins[0].range, bins[1].range);

        let edges = bin_edges(&[1000.0001, 1000.0002], BIN_COUNT).unwrap();
        let labels = edge_labels(&edges);
        let mut unique = labels.clone();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_no_speeds() {
        assert!(speed_distribution(&snapshot_of(&[None, None])).is_empty());
        assert!(speed_distribution(&Snapshot::empty()).is_empty());
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let edges = bin_edges(&[3.0, 7.3, 11.9], BIN_COUNT).unwrap();

        assert_eq!(bin_index(&edges, 11.9), BIN_COUNT - 1);
        assert_eq!(bin_index(&edges, 3.0), 0);
    }

    #[test]
    fn test_python_float() {
        assert_eq!(python_float(5.0), "5.0");
        assert_eq!(python_float(-0.1), "-0.1");
        assert_eq!(python_float(250.5), "250.5");
        assert_eq!(python_float(0.00001), "1e-05");
        assert_eq!(python_float(1.5e16), "1.5e+16");
    }

    #[test]
    fn test_round_frac() {
        assert_eq!(round_frac(123.45678, 3), 123.457);
        assert_eq!(round_frac(0.000123456, 3), 0.000123);
        assert_eq!(round_frac(0.0, 3), 0.0);
    }
}
