use crate::sources::{is_abs_series, Adapter};
use crate::types::{coerce_numeric, str_field, CleanTable, RawRecord};
use anyhow::Result;

/// Artifact column for the wholesale and retail trade volume index.
///
/// The feed's `volume_sa` field is in fact the unadjusted index; the header
/// keeps the NSA wording the artifact has always carried.
pub const TRADE_VOLUME_COLUMN: &str =
    "Malaysia: Volume Index of Wholesale & Retail Trade (NSA, 2010=100)";

/// Wholesale and retail trade volume: one record per date, series filter
/// plus rename, same shape as the price index feed.
pub struct TradeVolumeAdapter;

impl Adapter for TradeVolumeAdapter {
    fn clean(&self, raw: &[RawRecord]) -> Result<CleanTable> {
        let mut table = CleanTable::new(vec![TRADE_VOLUME_COLUMN.to_string()]);
        for record in raw.iter().filter(|r| is_abs_series(r)) {
            let date = str_field(record, "date").unwrap_or_default();
            let value = coerce_numeric(record.get("volume_sa"));
            table.push_row(date, vec![value]);
        }
        Ok(table)
    }
}
