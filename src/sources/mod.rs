pub mod employment;
pub mod gdp;
pub mod price_index;
pub mod trade_volume;

use crate::types::{coerce_numeric, str_field, CleanTable, RawRecord};
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

/// Series discriminator kept by every adapter. All other variants of a
/// catalogue payload (seasonally adjusted, growth rates) are dropped.
pub const ABS_SERIES: &str = "abs";

/// Reshapes one indicator family's raw payload into the canonical
/// date-plus-metrics table.
pub trait Adapter {
    /// Reshape raw records into the canonical table. An empty payload, or one
    /// the series filter empties out, still yields a well-formed table with
    /// the adapter's declared columns. Structural errors in the payload fail
    /// the whole indicator.
    fn clean(&self, raw: &[RawRecord]) -> Result<CleanTable>;
}

/// Look up the adapter registered for a configured indicator name.
pub fn create_adapter(name: &str) -> Option<Box<dyn Adapter>> {
    match name {
        "PPI" => Some(Box::new(price_index::PriceIndexAdapter)),
        "WholesaleRetail" => Some(Box::new(trade_volume::TradeVolumeAdapter)),
        "GDP" => Some(Box::new(gdp::GdpAdapter)),
        "Productivity" => Some(Box::new(employment::EmploymentAdapter)),
        _ => None,
    }
}

/// True for rows belonging to the absolute-value series variant. The
/// discriminator is matched case-insensitively; feeds have flipped casing
/// before.
pub fn is_abs_series(record: &RawRecord) -> bool {
    str_field(record, "series")
        .map(|s| s.eq_ignore_ascii_case(ABS_SERIES))
        .unwrap_or(false)
}

/// Pivot a long payload into one row per date.
///
/// Each record contributes its value to the column mapped from its
/// discriminator field; records whose discriminator is not in `levels` are
/// dropped, as are non-abs series rows. Output values align with `levels`
/// and rows come out in first-seen date order (the caller sorts later).
///
/// A repeated (date, discriminator) pair means the payload shape changed
/// upstream and there is no single value to pick, so it is an error.
pub(crate) fn pivot_by_date(
    raw: &[RawRecord],
    discriminator: &str,
    value_key: &str,
    levels: &[&str],
) -> Result<Vec<(String, Vec<Option<f64>>)>> {
    let mut dates: Vec<String> = Vec::new();
    let mut cells: HashMap<String, Vec<Option<f64>>> = HashMap::new();
    let mut seen: HashSet<(String, usize)> = HashSet::new();

    for record in raw.iter().filter(|r| is_abs_series(r)) {
        let Some(level) = str_field(record, discriminator) else {
            continue;
        };
        let Some(idx) = levels.iter().position(|l| *l == level) else {
            continue;
        };
        // Rows without a usable date pivot under the empty string; the
        // watermark filter excludes them later with a diagnostic.
        let date = str_field(record, "date").unwrap_or_default().to_string();

        if !seen.insert((date.clone(), idx)) {
            bail!("duplicate {} '{}' for date '{}'", discriminator, level, date);
        }
        if !cells.contains_key(&date) {
            dates.push(date.clone());
        }
        let row = cells.entry(date).or_insert_with(|| vec![None; levels.len()]);
        row[idx] = coerce_numeric(record.get(value_key));
    }

    Ok(dates
        .into_iter()
        .map(|date| {
            let row = cells.remove(&date).unwrap_or_else(|| vec![None; levels.len()]);
            (date, row)
        })
        .collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_util::record;

    #[test]
    fn test_registry_knows_all_indicator_names() {
        for name in ["PPI", "WholesaleRetail", "GDP", "Productivity"] {
            assert!(create_adapter(name).is_some(), "missing adapter for {name}");
        }
        assert!(create_adapter("CPI").is_none());
        assert!(create_adapter("ppi").is_none());
    }

    #[test]
    fn test_is_abs_series() {
        assert!(is_abs_series(&record(&[("series", json!("abs"))])));
        assert!(is_abs_series(&record(&[("series", json!("ABS"))])));
        assert!(!is_abs_series(&record(&[("series", json!("abs_sa"))])));
        assert!(!is_abs_series(&record(&[("series", json!(1))])));
        assert!(!is_abs_series(&record(&[("date", json!("2024-01-01"))])));
    }

    #[test]
    fn test_pivot_by_date_groups_levels() {
        let raw = vec![
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-03-31")),
                ("kind", json!("a")),
                ("value", json!(10.0)),
            ]),
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-03-31")),
                ("kind", json!("b")),
                ("value", json!(4.0)),
            ]),
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-06-30")),
                ("kind", json!("a")),
                ("value", json!(11.0)),
            ]),
        ];
        let rows = pivot_by_date(&raw, "kind", "value", &["a", "b"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("2024-03-31".to_string(), vec![Some(10.0), Some(4.0)]));
        assert_eq!(rows[1], ("2024-06-30".to_string(), vec![Some(11.0), None]));
    }

    #[test]
    fn test_pivot_by_date_skips_other_series_and_levels() {
        let raw = vec![
            record(&[
                ("series", json!("growth_yoy")),
                ("date", json!("2024-03-31")),
                ("kind", json!("a")),
                ("value", json!(99.0)),
            ]),
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-03-31")),
                ("kind", json!("zz")),
                ("value", json!(99.0)),
            ]),
        ];
        let rows = pivot_by_date(&raw, "kind", "value", &["a", "b"]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_pivot_by_date_rejects_duplicate_pair() {
        let raw = vec![
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-03-31")),
                ("kind", json!("a")),
                ("value", json!(1.0)),
            ]),
            record(&[
                ("series", json!("abs")),
                ("date", json!("2024-03-31")),
                ("kind", json!("a")),
                ("value", json!(2.0)),
            ]),
        ];
        let err = pivot_by_date(&raw, "kind", "value", &["a"]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
