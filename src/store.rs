// src/store.rs
//! The persisted price series.
//!
//! On disk it is a pretty-printed JSON array, one record per date, sorted
//! ascending:
//!
//! ```json
//! [
//!     {
//!         "date": "2025-07-21",
//!         "price": 139.9
//!     }
//! ]
//! ```
//!
//! In memory it is a [`Series`]: sorted, at most one [`Observation`] per date.
//! [`merge`] is the only way to add to it. There is no file lock: two runs
//! writing the same file at once is last-writer-wins.

use std::{fs, io, path::Path};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::file::ensure_directory;

/// One predicted price: cents per litre, for the day it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Observation {
    pub date: NaiveDate,
    #[serde(with = "price_number")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<Observation>);

impl Series {
    pub fn new() -> Self { Self::default() }

    /// Sort ascending by date; for repeated dates the first one seen wins.
    pub fn from_observations(mut obs: Vec<Observation>) -> Self {
        obs.sort_by_key(|o| o.date);
        obs.dedup_by_key(|o| o.date);
        Self(obs)
    }

    pub fn as_slice(&self) -> &[Observation] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> { self.0.iter() }

    /// Newest observation.
    pub fn latest(&self) -> Option<&Observation> { self.0.last() }

    pub fn get(&self, date: NaiveDate) -> Option<&Observation> {
        self.0
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| &self.0[i])
    }
}

/// Add `obs` unless its date is already present. Returns the new series and
/// whether anything was inserted; an existing date is never overwritten.
pub fn merge(mut series: Series, obs: Observation) -> (Series, bool) {
    match series.0.binary_search_by_key(&obs.date, |o| o.date) {
        Ok(_) => (series, false),
        Err(pos) => {
            series.0.insert(pos, obs);
            (series, true)
        }
    }
}

/// Strict parse of a snapshot.
pub fn try_load(snapshot: &str) -> Result<Series, ScrapeError> {
    let obs: Vec<Observation> = serde_json::from_str(snapshot)
        .map_err(|e| ScrapeError::SnapshotUnreadable(e.to_string()))?;
    Ok(Series::from_observations(obs))
}

/// Parse a snapshot; anything unreadable counts as an empty series so a
/// fresh checkout can bootstrap.
pub fn load(snapshot: &str) -> Series {
    try_load(snapshot).unwrap_or_else(|e| {
        warn!("{e}; starting from an empty series");
        Series::new()
    })
}

pub fn serialize(series: &Series) -> Result<String, ScrapeError> {
    let mut buf = Vec::with_capacity(64 * (series.len() + 1));
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    series.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Read the snapshot file. Missing or unreadable files give an empty series.
pub fn load_file(path: &Path) -> Series {
    match fs::read_to_string(path) {
        Ok(text) => load(&text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} not found; starting a new series", path.display());
            Series::new()
        }
        Err(e) => {
            warn!("Could not read {}: {e}; starting from an empty series", path.display());
            Series::new()
        }
    }
}

/// Replace the snapshot file: write a sibling temp file, then rename over.
pub fn save_file(path: &Path, series: &Series) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");

    let text = serialize(series)?;
    if let Err(e) = fs::write(&tmp, text).and_then(|()| fs::rename(&tmp, path)) {
        match fs::remove_file(&tmp) {
            Err(rm) if rm.kind() != io::ErrorKind::NotFound => {
                warn!("Could not remove {}: {rm}", Path::new(&tmp).display());
            }
            _ => {}
        }
        return Err(e.into());
    }
    Ok(())
}

/// Prices are stored as plain JSON numbers (`139.9`), not strings, written
/// digit for digit from the decimal so nothing is lost to `f64` rounding.
mod price_number {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _};
    use serde_json::value::RawValue;

    pub fn serialize<S: Serializer>(price: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        RawValue::from_string(price.to_string())
            .map_err(S::Error::custom)?
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let raw = Box::<RawValue>::deserialize(d)?;
        let text = raw.get();
        // strings, exponents and non-numbers all fail here
        let price = Decimal::from_str(text)
            .map_err(|_| D::Error::custom(format!("invalid price {text}")))?;
        if price.is_sign_negative() {
            return Err(D::Error::custom(format!("negative price {text}")));
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn obs(date: &str, price: &str) -> Observation {
        Observation {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    fn dates(s: &Series) -> Vec<String> {
        s.iter().map(|o| o.date.to_string()).collect()
    }

    #[test]
    fn merge_inserts_in_date_order() {
        let s = Series::new();
        let (s, a) = merge(s, obs("2025-07-21", "139.9"));
        let (s, b) = merge(s, obs("2025-07-19", "141.9"));
        let (s, c) = merge(s, obs("2025-07-20", "140.9"));
        assert!(a && b && c);
        assert_eq!(dates(&s), vec!["2025-07-19", "2025-07-20", "2025-07-21"]);
        assert_eq!(s.latest(), Some(&obs("2025-07-21", "139.9")));
    }

    #[test]
    fn merge_same_date_keeps_existing_value() {
        let (s, _) = merge(Series::new(), obs("2025-07-21", "139.9"));
        let (s2, inserted) = merge(s.clone(), obs("2025-07-21", "150.0"));
        assert!(!inserted);
        assert_eq!(s2, s);
        assert_eq!(s2.get(obs("2025-07-21", "0").date).unwrap().price, Decimal::from_str("139.9").unwrap());
    }

    #[test]
    fn one_record_snapshot() {
        let (s, inserted) = merge(Series::new(), obs("2025-07-21", "139.9"));
        assert!(inserted);
        let text = serialize(&s).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!([{ "date": "2025-07-21", "price": 139.9 }]));
    }

    #[test]
    fn serialize_is_pretty_with_four_spaces() {
        let s = Series::from_observations(vec![obs("2025-07-21", "139.9")]);
        let expected = "[\n    {\n        \"date\": \"2025-07-21\",\n        \"price\": 139.9\n    }\n]\n";
        assert_eq!(serialize(&s).unwrap(), expected);
        assert_eq!(serialize(&Series::new()).unwrap(), "[]\n");
    }

    #[test]
    fn malformed_snapshots_load_empty() {
        for bad in ["", "not json", "{}", r#"{"date":"2025-07-21","price":1}"#,
                    r#"[{"date":"21/07/2025","price":139.9}]"#,
                    r#"[{"date":"2025-07-21","price":"139.9"}]"#,
                    r#"[{"date":"2025-07-21"}]"#,
                    r#"[{"date":"2025-07-21","price":-1.0}]"#,
                    r#"[{"date":"2025-07-21","price":139.9,"extra":true}]"#] {
            assert!(load(bad).is_empty(), "expected empty series for {bad:?}");
            assert!(matches!(try_load(bad), Err(ScrapeError::SnapshotUnreadable(_))));
        }
    }

    #[test]
    fn load_repairs_order_and_duplicates() {
        let text = r#"[
            {"date": "2025-07-22", "price": 138.9},
            {"date": "2025-07-20", "price": 141.9},
            {"date": "2025-07-22", "price": 150.0}
        ]"#;
        let s = load(text);
        assert_eq!(dates(&s), vec!["2025-07-20", "2025-07-22"]);
        assert_eq!(s.latest().unwrap().price, Decimal::from_str("138.9").unwrap());
    }

    #[test]
    fn long_prices_keep_every_digit() {
        let price = crate::normalize::parse_price("139.12345678901234567").unwrap();
        let s = Series::from_observations(vec![Observation { date: obs("2025-07-21", "0").date, price }]);
        let text = serialize(&s).unwrap();
        assert!(text.contains("\"price\": 139.12345678901234567\n"), "{text}");
        assert_eq!(try_load(&text).unwrap(), s);
    }

    #[test]
    fn exponent_prices_are_malformed() {
        assert!(try_load(r#"[{"date":"2025-07-21","price":1.399e2}]"#).is_err());
    }

    #[test]
    fn integer_prices_load() {
        let s = load(r#"[{"date":"2025-07-21","price":140}]"#);
        assert_eq!(s.as_slice(), &[obs("2025-07-21", "140")]);
    }

    #[test]
    fn file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gas_prices.json");
        assert!(load_file(&path).is_empty());

        let s = Series::from_observations(vec![obs("2025-07-20", "141.9"), obs("2025-07-21", "139.9")]);
        save_file(&path, &s).unwrap();
        assert_eq!(load_file(&path), s);
        assert!(!path.with_file_name("gas_prices.json.tmp").exists());
    }

    #[test]
    fn failed_rename_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory where the snapshot should go can't be replaced
        let path = dir.path().join("gas_prices.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let s = Series::from_observations(vec![obs("2025-07-21", "139.9")]);
        let err = save_file(&path, &s).unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
        assert!(!dir.path().join("gas_prices.json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    fn arb_obs() -> impl Strategy<Value = Observation> {
        (0i64..3650, 0i64..i64::MAX, 0u32..=20).prop_map(|(day, mantissa, scale)| Observation {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(day as u64),
            price: Decimal::new(mantissa, scale),
        })
    }

    fn arb_series() -> impl Strategy<Value = Series> {
        prop::collection::vec(arb_obs(), 0..40).prop_map(|v| {
            v.into_iter().fold(Series::new(), |s, o| merge(s, o).0)
        })
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(s in arb_series(), o in arb_obs()) {
            let (once, _) = merge(s, o.clone());
            let (twice, inserted) = merge(once.clone(), o);
            prop_assert!(!inserted);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn merged_dates_strictly_ascending(s in arb_series()) {
            prop_assert!(s.as_slice().windows(2).all(|w| w[0].date < w[1].date));
        }

        #[test]
        fn snapshot_round_trips(s in arb_series()) {
            let text = serialize(&s).unwrap();
            prop_assert_eq!(try_load(&text).unwrap(), s);
        }
    }
}
