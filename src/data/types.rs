use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Number of positional columns in an upstream state vector
pub const COLUMN_COUNT: usize = 17;

/// Callsign as reported upstream. Almost always text, but the feed is untyped,
/// so anything else is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Callsign {
    Text(String),
    Other(Value),
}

impl Callsign {
    /// First `n` characters of a text callsign (fewer if it is shorter).
    /// Non-text callsigns have no prefix.
    pub fn prefix(&self, n: usize) -> Option<String> {
        match self {
            Callsign::Text(s) => Some(s.chars().take(n).collect()),
            Callsign::Other(_) => None,
        }
    }
}

#[cfg(test)]
impl From<&str> for Callsign {
    fn from(s: &str) -> Self {
        Callsign::Text(s.to_string())
    }
}

/// One aircraft state vector. Column order is the upstream contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightRow {
    pub icao24: Option<String>,
    pub callsign: Option<Callsign>,
    pub origin_country: Option<String>,
    pub time_position: Option<DateTime<Utc>>,   // Null when missing or not a valid unix time
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub velocity: Option<f64>,                  // Ground speed, m/s
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i64>>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    pub position_source: Option<i64>,           // 0=ADS-B, 1=ASTERIX, 2=MLAT
}

/// Rows of a single fetch, owned by the request that made it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub rows: Vec<FlightRow>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self { rows: vec![] }
    }

    pub fn new(rows: Vec<FlightRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Top-level body of the states endpoint. `states` must be present but may be null.
#[derive(Debug, Deserialize)]
pub struct StatesResponse {
    #[serde(deserialize_with = "nullable")]
    pub states: Option<Vec<FlightRow>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer)
}

impl From<StatesResponse> for Snapshot {
    fn from(response: StatesResponse) -> Self {
        Snapshot::new(response.states.unwrap_or_default())
    }
}

/// Unix seconds to a UTC timestamp. Anything outside the signed 64-bit
/// nanosecond range (1677-09-21 to 2262-04-11), or not a number, becomes None.
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    let Value::Number(n) = value else { return None };

    let (secs, nanos) = match n.as_i64() {
        Some(secs) => (secs, 0),
        None => {
            let secs = n.as_f64()?;
            if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
                return None;
            }
            let whole = secs.floor();
            let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
            (whole as i64, nanos)
        }
    };

    let total_nanos = secs as i128 * 1_000_000_000 + nanos as i128;
    if total_nanos <= i64::MIN as i128 || total_nanos > i64::MAX as i128 {
        return None;
    }

    DateTime::from_timestamp(secs, nanos)
}

impl<'de> Deserialize<'de> for FlightRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(FlightRowVisitor)
    }
}

struct FlightRowVisitor;

/// Pulls columns in order; once the row runs out every further column is null.
/// A cell of the wrong type is null too, so one odd value only costs that cell.
struct Columns<A> {
    seq: A,
    exhausted: bool,
}

impl<'de, A: SeqAccess<'de>> Columns<A> {
    fn raw(&mut self) -> Result<Option<Value>, A::Error> {
        if self.exhausted {
            return Ok(None);
        }
        match self.seq.next_element::<Option<Value>>()? {
            Some(value) => Ok(value),
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, A::Error> {
        Ok(self.raw()?.and_then(|value| T::deserialize(value).ok()))
    }
}

impl<'de> Visitor<'de> for FlightRowVisitor {
    type Value = FlightRow;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an array of at most {} state vector columns", COLUMN_COUNT)
    }

    fn visit_seq<A>(self, seq: A) -> Result<FlightRow, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut cols = Columns { seq, exhausted: false };

        let row = FlightRow {
            icao24: cols.next()?,
            callsign: cols.next()?,
            origin_country: cols.next()?,
            time_position: cols.raw()?.as_ref().and_then(timestamp_from_value),
            last_contact: cols.next()?,
            longitude: cols.next()?,
            latitude: cols.next()?,
            baro_altitude: cols.next()?,
            on_ground: cols.next()?,
            velocity: cols.next()?,
            true_track: cols.next()?,
            vertical_rate: cols.next()?,
            sensors: cols.next()?,
            geo_altitude: cols.next()?,
            squawk: cols.next()?,
            spi: cols.next()?,
            position_source: cols.next()?,
        };

        if !cols.exhausted && cols.seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(COLUMN_COUNT + 1, &self));
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = r#"{"states": [["abc123","UAL123  ","United States",1700000000,1700000000,-122.1,37.5,1000,false,250.5,90,0,null,1000,"1200",false,0]]}"#;

    #[test]
    fn test_decode_full_row() {
        let response: StatesResponse = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = Snapshot::from(response);

        assert_eq!(snapshot.len(), 1);
        let row = &snapshot.rows[0];
        assert_eq!(row.icao24.as_deref(), Some("abc123"));
        assert_eq!(row.callsign, Some(Callsign::from("UAL123  ")));
        assert_eq!(row.origin_country.as_deref(), Some("United States"));
        assert_eq!(row.time_position.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(row.longitude, Some(-122.1));
        assert_eq!(row.latitude, Some(37.5));
        assert_eq!(row.on_ground, Some(false));
        assert_eq!(row.velocity, Some(250.5));
        assert_eq!(row.sensors, None);
        assert_eq!(row.squawk.as_deref(), Some("1200"));
        assert_eq!(row.position_source, Some(0));
    }

    #[test]
    fn test_short_row_pads_with_nulls() {
        let row: FlightRow = serde_json::from_str(r#"["abc123", "DLH4", "Germany"]"#).unwrap();

        assert_eq!(row.origin_country.as_deref(), Some("Germany"));
        assert_eq!(row.time_position, None);
        assert_eq!(row.velocity, None);
        assert_eq!(row.position_source, None);
    }

    #[test]
    fn test_long_row_is_rejected() {
        let json = r#"["a",null,"X",null,null,null,null,null,false,null,null,null,null,null,null,false,0,7]"#;
        assert!(serde_json::from_str::<FlightRow>(json).is_err());
    }

    #[test]
    fn test_wrong_typed_cell_becomes_null() {
        let row: FlightRow = serde_json::from_str(r#"["a", "B", 42, null, "late", null, null, null, 0, "fast"]"#).unwrap();

        assert_eq!(row.callsign, Some(Callsign::from("B")));
        assert_eq!(row.origin_country, None);
        assert_eq!(row.last_contact, None);
        assert_eq!(row.on_ground, None);
        assert_eq!(row.velocity, None);
    }

    #[test]
    fn test_odd_cell_keeps_other_rows() {
        let json = r#"{"states": [
            ["abc123","UAL123  ","United States",1700000000,1700000000,-122.1,37.5,1000,false,250.5,90,0,null,1000,"1200",false,0],
            ["def456","DLH1","Germany",1700000000,1700000000,8.5,50.0,1000,0,230.0,90,0,null,1000,"1000",false,0]
        ]}"#;
        let snapshot = Snapshot::from(serde_json::from_str::<StatesResponse>(json).unwrap());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows[0].on_ground, Some(false));
        assert_eq!(snapshot.rows[1].on_ground, None);
        assert_eq!(snapshot.rows[1].velocity, Some(230.0));
        assert_eq!(snapshot.rows[1].origin_country.as_deref(), Some("Germany"));
    }

    #[test]
    fn test_non_array_row_is_rejected() {
        assert!(serde_json::from_str::<StatesResponse>(r#"{"states": [{"icao24": "a"}]}"#).is_err());
        assert!(serde_json::from_str::<StatesResponse>(r#"{"states": ["abc123"]}"#).is_err());
    }

    #[test]
    fn test_time_position_outside_nanosecond_range_is_null() {
        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", 10000000000]"#).unwrap();
        assert_eq!(row.time_position, None);

        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", -10000000000]"#).unwrap();
        assert_eq!(row.time_position, None);

        // 2262-04-11 and 1677-09-22 are still representable
        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", 9223372036]"#).unwrap();
        assert!(row.time_position.is_some());
        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", -9223372036]"#).unwrap();
        assert!(row.time_position.is_some());
    }

    #[test]
    fn test_bad_time_position_becomes_null() {
        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", "yesterday"]"#).unwrap();
        assert_eq!(row.time_position, None);

        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", 1e300]"#).unwrap();
        assert_eq!(row.time_position, None);

        let row: FlightRow = serde_json::from_str(r#"["a", "B", "C", 3600.5]"#).unwrap();
        let ts = row.time_position.unwrap();
        assert_eq!(ts.hour(), 1);
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_non_text_callsign_is_kept() {
        let row: FlightRow = serde_json::from_str(r#"["a", 4711, "C"]"#).unwrap();
        let callsign = row.callsign.unwrap();

        assert_eq!(callsign, Callsign::Other(serde_json::json!(4711)));
        assert_eq!(callsign.prefix(3), None);
    }

    #[test]
    fn test_callsign_prefix() {
        assert_eq!(Callsign::from("UAL123").prefix(3).as_deref(), Some("UAL"));
        assert_eq!(Callsign::from("AB").prefix(3).as_deref(), Some("AB"));
        assert_eq!(Callsign::from("").prefix(3).as_deref(), Some(""));
    }

    #[test]
    fn test_null_states_is_empty() {
        let response: StatesResponse = serde_json::from_str(r#"{"time": 1, "states": null}"#).unwrap();
        assert!(Snapshot::from(response).is_empty());
    }

    #[test]
    fn test_missing_states_is_rejected() {
        assert!(serde_json::from_str::<StatesResponse>(r#"{"time": 1}"#).is_err());
        assert!(serde_json::from_str::<StatesResponse>(r#"[1, 2, 3]"#).is_err());
    }
}
