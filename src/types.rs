use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Marker written for missing cells in the output artifact.
pub const NA_MARKER: &str = "#N/A";

/// Display format for date labels in the merged table, e.g. "Mar-24".
pub const DATE_LABEL_FORMAT: &str = "%b-%y";

/// Wire format of row dates in catalogue payloads.
pub const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

/// One record as returned by the catalogue API: a flat JSON object.
pub type RawRecord = Map<String, Value>;

/// The raw payload of one indicator: a JSON array of records.
pub type RawTable = Vec<RawRecord>;

/// Coerce a raw JSON value to a number.
///
/// Numbers pass through, numeric strings parse, and everything else (null,
/// booleans, non-numeric text, absent fields) becomes None. Uncoercible
/// values are kept as missing cells, never dropped from their row.
pub fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Fetch a string field from a raw record, None if absent or not a string.
pub fn str_field<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    match record.get(key)? {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// One cleaned row: the raw date string plus one value per metric column.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub date: String,
    pub values: Vec<Option<f64>>,
}

/// Adapter output: named metric columns plus rows in payload order.
///
/// Dates stay raw strings here; parsing them against the watermark is the
/// pipeline's job, so the adapters never decide what gets excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    pub columns: Vec<String>,
    pub rows: Vec<CleanRow>,
}

impl CleanTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, date: impl Into<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(CleanRow {
            date: date.into(),
            values,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One filtered row: typed date plus one value per metric column.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// A per-source table after the watermark filter: every date strictly after
/// the source's watermark, rows sorted ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

impl SeriesTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One merged row: the display label plus one cell per merged column.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub label: String,
    pub cells: Vec<Option<f64>>,
}

/// The final wide table: the union of all metric columns in merge order,
/// rows ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTable {
    pub columns: Vec<String>,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
