//! Full outer join of per-source tables into one wide table keyed by date.

use crate::types::{MergedRow, MergedTable, SeriesTable, DATE_LABEL_FORMAT};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// Accumulates per-source tables one at a time; `finalize` yields the wide
/// table. Column order is merge order (the first table's columns first),
/// row order falls out of the date-keyed map.
pub struct Merger {
    columns: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl Merger {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Outer-join one table into the accumulator.
    ///
    /// A date present on only one side keeps that side's cells and leaves the
    /// other side's columns missing. A column name already merged earlier is
    /// folded into the existing position rather than duplicated.
    pub fn merge(&mut self, table: &SeriesTable) {
        let mut positions = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            match self.columns.iter().position(|c| c == column) {
                Some(idx) => {
                    warn!("duplicate column '{}', merging into existing position", column);
                    positions.push(idx);
                }
                None => {
                    self.columns.push(column.clone());
                    positions.push(self.columns.len() - 1);
                }
            }
        }

        // Widen rows from earlier merges for any newly appended columns.
        let width = self.columns.len();
        for cells in self.rows.values_mut() {
            cells.resize(width, None);
        }

        for row in &table.rows {
            let cells = self
                .rows
                .entry(row.date)
                .or_insert_with(|| vec![None; width]);
            for (value, &idx) in row.values.iter().zip(&positions) {
                cells[idx] = *value;
            }
        }
    }

    /// Finish the join: rows ascending by date, each carrying its display
    /// label and one cell per merged column.
    pub fn finalize(self) -> MergedTable {
        let rows = self
            .rows
            .into_iter()
            .map(|(date, cells)| MergedRow {
                label: date.format(DATE_LABEL_FORMAT).to_string(),
                date,
                cells,
            })
            .collect();
        MergedTable {
            columns: self.columns,
            rows,
        }
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}
