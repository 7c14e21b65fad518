use crate::sources::{pivot_by_date, Adapter};
use crate::types::{CleanTable, RawRecord};
use anyhow::Result;

pub const EXPORTS_COLUMN: &str =
    "Malaysia: GDP: Exports of Goods and Services (SA, Mil.2015.Ringgit)";
pub const IMPORTS_COLUMN: &str =
    "Malaysia: GDP: Imports of Goods and Services (SA, Mil.2015.Ringgit)";
pub const NET_EXPORTS_COLUMN: &str =
    "Malaysia: GDP: Net Exports of Goods and Services (SA, Mil.2015.Ringgit)";

/// Expenditure-side component codes in the quarterly GDP feed.
const TYPE_EXPORTS: &str = "e5";
const TYPE_IMPORTS: &str = "e6";

/// Quarterly GDP by expenditure component. The payload is long (one record
/// per date and component), so cleaning pivots exports and imports into
/// columns and derives net exports from them. Net exports is only computed
/// when both sides are present; a one-sided quarter stays missing rather
/// than pretending the other side is zero.
pub struct GdpAdapter;

impl Adapter for GdpAdapter {
    fn clean(&self, raw: &[RawRecord]) -> Result<CleanTable> {
        let pivoted = pivot_by_date(raw, "type", "value", &[TYPE_EXPORTS, TYPE_IMPORTS])?;
        let mut table = CleanTable::new(vec![
            EXPORTS_COLUMN.to_string(),
            IMPORTS_COLUMN.to_string(),
            NET_EXPORTS_COLUMN.to_string(),
        ]);
        for (date, values) in pivoted {
            let exports = values[0];
            let imports = values[1];
            let net = match (exports, imports) {
                (Some(e), Some(m)) => Some(e - m),
                _ => None,
            };
            table.push_row(date, vec![exports, imports, net]);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_util::record;
    use serde_json::json;

    fn gdp_record(date: &str, component: &str, value: f64) -> RawRecord {
        record(&[
            ("series", json!("abs")),
            ("date", json!(date)),
            ("type", json!(component)),
            ("value", json!(value)),
        ])
    }

    #[test]
    fn test_pivots_components_and_derives_net_exports() {
        let raw = vec![
            gdp_record("2024-03-31", "e5", 250_000.0),
            gdp_record("2024-03-31", "e6", 230_000.0),
            gdp_record("2024-06-30", "e5", 255_000.0),
            gdp_record("2024-06-30", "e6", 240_000.0),
        ];
        let table = GdpAdapter.clean(&raw).unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].values,
            vec![Some(250_000.0), Some(230_000.0), Some(20_000.0)]
        );
        assert_eq!(
            table.rows[1].values,
            vec![Some(255_000.0), Some(240_000.0), Some(15_000.0)]
        );
    }

    #[test]
    fn test_ignores_other_components() {
        let raw = vec![
            gdp_record("2024-03-31", "e1", 180_000.0),
            gdp_record("2024-03-31", "e5", 250_000.0),
            gdp_record("2024-03-31", "e6", 230_000.0),
        ];
        let table = GdpAdapter.clean(&raw).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values[2], Some(20_000.0));
    }

    #[test]
    fn test_net_exports_missing_when_one_side_missing() {
        let raw = vec![gdp_record("2024-03-31", "e5", 250_000.0)];
        let table = GdpAdapter.clean(&raw).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values, vec![Some(250_000.0), None, None]);
    }

    #[test]
    fn test_duplicate_component_fails_the_indicator() {
        let raw = vec![
            gdp_record("2024-03-31", "e5", 250_000.0),
            gdp_record("2024-03-31", "e5", 251_000.0),
        ];
        assert!(GdpAdapter.clean(&raw).is_err());
    }

    #[test]
    fn test_filtered_out_payload_keeps_columns() {
        let raw = vec![record(&[
            ("series", json!("growth_qoq")),
            ("date", json!("2024-03-31")),
            ("type", json!("e5")),
            ("value", json!(1.2)),
        ])];
        let table = GdpAdapter.clean(&raw).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 3);
    }
}
