//! Incremental artifact persistence.
//!
//! Two-branch protocol: when the artifact does not exist, write the full
//! layout (attribution row, frequency row, header row, then data); when it
//! does, append only the data rows after the current last row and never
//! rewrite what is already there. The decision is computed as a pure plan
//! first, then committed in one atomic rename, so an interrupted run leaves
//! either the old artifact or the new one, never a half-written file.

use crate::config::ColumnMeta;
use crate::types::{MergedTable, NA_MARKER};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Header label of the date column.
const DATE_HEADER: &str = "Date";

/// Snapshot of an artifact already on disk: verbatim bytes plus row count.
#[derive(Debug, Clone)]
pub struct ExistingArtifact {
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl ExistingArtifact {
    /// Load the artifact if present. An unreadable existing artifact is
    /// fatal; appending blind could corrupt it.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(path).with_context(|| format!("reading artifact {}", path.display()))?;
        let rows = count_rows(&bytes)
            .with_context(|| format!("scanning artifact {}", path.display()))?;
        Ok(Some(Self { bytes, rows }))
    }
}

fn count_rows(bytes: &[u8]) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = 0usize;
    for record in reader.records() {
        record.context("reading artifact row")?;
        rows += 1;
    }
    Ok(rows)
}

/// What a persistence run will do, decided before any write happens.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePlan {
    /// Artifact absent: write the three header rows plus the data rows.
    Create { records: Vec<Vec<String>> },
    /// Artifact present: append data rows only, starting at `start_row`
    /// (1-based, one past the current last row).
    Append {
        start_row: usize,
        records: Vec<Vec<String>>,
    },
}

/// Writes the merged table to the artifact under the two-branch protocol.
pub struct OutputWriter {
    path: PathBuf,
    column_meta: Vec<ColumnMeta>,
}

impl OutputWriter {
    pub fn new(path: impl Into<PathBuf>, column_meta: Vec<ColumnMeta>) -> Self {
        Self {
            path: path.into(),
            column_meta,
        }
    }

    /// Decide between the create and append branches. Pure: same inputs,
    /// same plan, no I/O.
    pub fn plan(&self, existing: Option<&ExistingArtifact>, table: &MergedTable) -> WritePlan {
        let data = data_records(table);
        match existing {
            Some(artifact) => WritePlan::Append {
                start_row: artifact.rows + 1,
                records: data,
            },
            None => {
                let mut records = Vec::with_capacity(data.len() + 3);
                records.push(self.attribution_row(table.columns.len()));
                records.push(self.frequency_row(table.columns.len()));
                records.push(header_row(table));
                records.extend(data);
                WritePlan::Create { records }
            }
        }
    }

    /// Execute the plan: assemble the full new content (existing bytes kept
    /// verbatim on append), write it to a sibling temp file, rename into
    /// place. Appending zero rows leaves the artifact untouched.
    pub fn commit(&self, existing: Option<&ExistingArtifact>, plan: &WritePlan) -> Result<()> {
        let records = match plan {
            WritePlan::Create { records } => records,
            WritePlan::Append { records, .. } => {
                if records.is_empty() {
                    info!("No rows to append, artifact left untouched");
                    return Ok(());
                }
                records
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let mut content: Vec<u8> = Vec::new();
        if matches!(plan, WritePlan::Append { .. }) {
            let Some(artifact) = existing else {
                bail!("append plan requires the existing artifact");
            };
            content.extend_from_slice(&artifact.bytes);
            if !content.is_empty() && !content.ends_with(b"\n") {
                content.push(b'\n');
            }
        }
        encode_records(&mut content, records)?;

        let tmp_path = self.path.with_extension("csv.tmp");
        fs::write(&tmp_path, &content)
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err)
                .with_context(|| format!("moving artifact into place at {}", self.path.display()));
        }

        match plan {
            WritePlan::Create { records } => {
                info!("Created {} with {} rows", self.path.display(), records.len());
            }
            WritePlan::Append { start_row, records } => {
                info!(
                    "Appended {} rows to {} starting at row {}",
                    records.len(),
                    self.path.display(),
                    start_row
                );
            }
        }
        Ok(())
    }

    /// Row 1: empty date cell, then one attribution per configured column.
    /// The mapping is positional and static, so it is written in full even
    /// when a run produced fewer data columns.
    fn attribution_row(&self, data_columns: usize) -> Vec<String> {
        let width = 1 + self.column_meta.len().max(data_columns);
        let mut row = vec![String::new(); width];
        for (i, meta) in self.column_meta.iter().enumerate() {
            row[i + 1] = meta.attribution.clone();
        }
        row
    }

    /// Row 2: empty date cell, then each column's reporting cadence.
    fn frequency_row(&self, data_columns: usize) -> Vec<String> {
        let width = 1 + self.column_meta.len().max(data_columns);
        let mut row = vec![String::new(); width];
        for (i, meta) in self.column_meta.iter().enumerate() {
            row[i + 1] = meta.frequency.clone();
        }
        row
    }
}

/// Row 3: "Date" plus the metric column names from this run's merge.
fn header_row(table: &MergedTable) -> Vec<String> {
    let mut row = Vec::with_capacity(table.columns.len() + 1);
    row.push(DATE_HEADER.to_string());
    row.extend(table.columns.iter().cloned());
    row
}

/// Data rows: the display label plus every cell, missing cells rendered as
/// the #N/A marker.
fn data_records(table: &MergedTable) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut record = Vec::with_capacity(row.cells.len() + 1);
            record.push(row.label.clone());
            record.extend(row.cells.iter().map(|cell| match cell {
                Some(value) => value.to_string(),
                None => NA_MARKER.to_string(),
            }));
            record
        })
        .collect()
}

fn encode_records(content: &mut Vec<u8>, records: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(content);
    for record in records {
        writer.write_record(record).context("encoding artifact row")?;
    }
    writer.flush().context("flushing artifact rows")?;
    Ok(())
}
