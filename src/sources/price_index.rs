use crate::sources::{is_abs_series, Adapter};
use crate::types::{coerce_numeric, str_field, CleanTable, RawRecord};
use anyhow::Result;

/// Artifact column for the producer price index, local production.
pub const PPI_COLUMN: &str = "Malaysia: PPI: Local Production (NSA, 2010=100)";

/// Producer price index: already one record per date, so cleaning is a
/// series filter plus a column rename.
pub struct PriceIndexAdapter;

impl Adapter for PriceIndexAdapter {
    fn clean(&self, raw: &[RawRecord]) -> Result<CleanTable> {
        let mut table = CleanTable::new(vec![PPI_COLUMN.to_string()]);
        for record in raw.iter().filter(|r| is_abs_series(r)) {
            let date = str_field(record, "date").unwrap_or_default();
            let value = coerce_numeric(record.get("index"));
            table.push_row(date, vec![value]);
        }
        Ok(table)
    }
}
