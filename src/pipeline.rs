//! Per-indicator pipeline: fetch the catalogue payload, clean it through the
//! adapter, drop everything at or before the watermark, sort what is left.
//!
//! Indicators are independent. Any failure inside one run degrades that
//! indicator to an empty table with a warning instead of aborting the
//! process, so one bad feed cannot block the others.

use crate::config::SourceSpec;
use crate::sources::Adapter;
use crate::types::{CleanTable, RawTable, SeriesRow, SeriesTable, DATE_WIRE_FORMAT};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Request timeout for catalogue fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the blocking HTTP agent shared by every indicator fetch.
pub fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build()
}

fn fetch_raw_table(agent: &ureq::Agent, url: &str) -> Result<RawTable> {
    let response = agent
        .get(url)
        .call()
        .with_context(|| format!("fetching {}", url))?;
    let raw: RawTable = response
        .into_json()
        .with_context(|| format!("decoding response from {}", url))?;
    Ok(raw)
}

/// Run the full pipeline for one indicator.
///
/// An empty result is a normal outcome meaning no rows newer than the
/// watermark; callers treat it the same whether the feed had nothing new or
/// the indicator degraded on an error.
pub fn pull_series(agent: &ureq::Agent, source: &SourceSpec, adapter: &dyn Adapter) -> SeriesTable {
    info!("Fetching {} from {}", source.name, source.url);
    let raw = match fetch_raw_table(agent, &source.url) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("{}: fetch failed, skipping this run: {:#}", source.name, err);
            return SeriesTable::default();
        }
    };
    debug!("{}: {} raw records", source.name, raw.len());

    let clean = match adapter.clean(&raw) {
        Ok(clean) => clean,
        Err(err) => {
            warn!("{}: clean failed, skipping this run: {:#}", source.name, err);
            return SeriesTable::default();
        }
    };

    let table = filter_and_sort(&source.name, clean, source.last_updated);
    info!(
        "{}: {} rows newer than watermark {}",
        source.name,
        table.rows.len(),
        source.last_updated
    );
    table
}

/// Keep rows strictly after the watermark, sorted ascending by date.
///
/// A row whose date does not parse cannot be shown to be newer than the
/// watermark, so it is excluded like any stale row. Exclusions are counted
/// and logged so malformed feeds are visible rather than silently short.
pub fn filter_and_sort(name: &str, clean: CleanTable, watermark: NaiveDate) -> SeriesTable {
    let mut rows: Vec<SeriesRow> = Vec::new();
    let mut unparseable = 0usize;

    for row in clean.rows {
        match NaiveDate::parse_from_str(&row.date, DATE_WIRE_FORMAT) {
            Ok(date) if date > watermark => rows.push(SeriesRow {
                date,
                values: row.values,
            }),
            Ok(_) => {}
            Err(_) => {
                unparseable += 1;
                debug!("{}: excluding row with unparseable date '{}'", name, row.date);
            }
        }
    }
    if unparseable > 0 {
        warn!("{}: excluded {} rows with unparseable dates", name, unparseable);
    }

    rows.sort_by_key(|row| row.date);
    SeriesTable {
        columns: clean.columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_WIRE_FORMAT).unwrap()
    }

    fn clean_table(rows: &[(&str, f64)]) -> CleanTable {
        let mut table = CleanTable::new(vec!["Metric".to_string()]);
        for (d, v) in rows {
            table.push_row(*d, vec![Some(*v)]);
        }
        table
    }

    #[test]
    fn test_watermark_is_strict() {
        let clean = clean_table(&[
            ("2024-01-01", 1.0),
            ("2024-02-01", 2.0),
            ("2024-03-01", 3.0),
        ]);
        let table = filter_and_sort("t", clean, date("2024-02-01"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].date, date("2024-03-01"));
        assert_eq!(table.rows[0].values, vec![Some(3.0)]);
    }

    #[test]
    fn test_rows_come_out_sorted() {
        let clean = clean_table(&[
            ("2024-03-01", 3.0),
            ("2024-01-01", 1.0),
            ("2024-02-01", 2.0),
        ]);
        let table = filter_and_sort("t", clean, date("2023-12-31"));
        let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]
        );
    }

    #[test]
    fn test_unparseable_dates_are_excluded() {
        let mut clean = clean_table(&[("2024-02-01", 2.0)]);
        clean.push_row("not-a-date", vec![Some(9.0)]);
        clean.push_row("", vec![Some(8.0)]);
        let table = filter_and_sort("t", clean, date("2024-01-01"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values, vec![Some(2.0)]);
    }

    #[test]
    fn test_nothing_new_yields_empty_table_with_columns() {
        let clean = clean_table(&[("2024-01-01", 1.0)]);
        let table = filter_and_sort("t", clean, date("2024-06-30"));
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["Metric".to_string()]);
    }

    #[test]
    fn test_missing_values_survive_the_filter() {
        let mut clean = CleanTable::new(vec!["A".to_string(), "B".to_string()]);
        clean.push_row("2024-02-01", vec![None, Some(2.0)]);
        let table = filter_and_sort("t", clean, date("2024-01-01"));
        assert_eq!(table.rows[0].values, vec![None, Some(2.0)]);
    }
}
