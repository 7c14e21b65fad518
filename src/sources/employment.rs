use crate::sources::{pivot_by_date, Adapter};
use crate::types::{CleanTable, RawRecord};
use anyhow::Result;

/// Sector codes in the quarterly productivity feed, in artifact order.
const SECTORS: [&str; 5] = ["p1", "p2", "p3", "p4", "p5"];

/// Artifact columns, aligned with `SECTORS`.
const SECTOR_COLUMNS: [&str; 5] = [
    "Malaysia: Employment: Agriculture, Forestry and Fishing (NSA, Thous)",
    "Malaysia: Employment: Mining and Quarrying (NSA, Thous)",
    "Malaysia: Employment: Manufacturing (NSA, Thous)",
    "Malaysia: Employment: Construction (NSA, Thous)",
    "Malaysia: Employment: Services (NSA, Thous)",
];

/// Sector employment out of the quarterly productivity feed. Long payload
/// (one record per date and sector) pivoted into five columns; only the
/// employment field is kept, the productivity metrics in the same records
/// are not part of the artifact.
pub struct EmploymentAdapter;

impl Adapter for EmploymentAdapter {
    fn clean(&self, raw: &[RawRecord]) -> Result<CleanTable> {
        let pivoted = pivot_by_date(raw, "sector", "employment", &SECTORS)?;
        let mut table =
            CleanTable::new(SECTOR_COLUMNS.iter().map(|c| c.to_string()).collect());
        for (date, values) in pivoted {
            table.push_row(date, values);
        }
        Ok(table)
    }
}
