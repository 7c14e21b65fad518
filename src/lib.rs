pub mod cli;
pub mod config;
pub mod display;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod types;

// Re-exports for library users
pub use config::{ArtifactConfig, ColumnMeta, Config, SourceSpec};
pub use display::display_merged_table;
pub use merge::Merger;
pub use output::{ExistingArtifact, OutputWriter, WritePlan};
pub use pipeline::{build_agent, filter_and_sort, pull_series};
pub use sources::{create_adapter, Adapter};
pub use types::{
    coerce_numeric, CleanRow, CleanTable, MergedRow, MergedTable, RawRecord, RawTable, SeriesRow,
    SeriesTable, DATE_LABEL_FORMAT, DATE_WIRE_FORMAT, NA_MARKER,
};
