use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One indicator series to pull: registry name, catalogue URL, and the
/// watermark date of the newest row already persisted for it.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    pub last_updated: NaiveDate,
}

/// Static metadata for one metric column position in the artifact header.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMeta {
    /// Catalogue URL the column came from, or a free-form label for
    /// derived columns.
    #[serde(default)]
    pub attribution: String,
    /// Reporting cadence, e.g. "Monthly" or "Quarterly".
    #[serde(default)]
    pub frequency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    pub path: PathBuf,
    /// Per-column header metadata, positional, left to right. Not derived
    /// from the data: a run that yields fewer columns still writes the
    /// configured header in full.
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
}

/// Full run configuration as loaded from the YAML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: Vec<SourceSpec>,
    pub artifact: ArtifactConfig,
}

impl Config {
    /// Load and parse the YAML config. Any failure here is fatal to the run.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
sources:
  - name: PPI
    url: https://api.example.gov/data-catalogue?id=ppi
    last_updated: 2024-03-31
  - name: GDP
    url: https://api.example.gov/data-catalogue?id=gdp_qtr
    last_updated: 2023-12-31

artifact:
  path: data/output.csv
  columns:
    - attribution: https://example.gov/data-catalogue/ppi
      frequency: Monthly
    - attribution: Derived (Exports - Imports)
      frequency: Quarterly
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name, "PPI");
        assert_eq!(
            config.sources[0].last_updated,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert_eq!(config.artifact.path, PathBuf::from("data/output.csv"));
        assert_eq!(config.artifact.columns.len(), 2);
        assert_eq!(config.artifact.columns[1].frequency, "Quarterly");
    }

    #[test]
    fn test_artifact_columns_default_empty() {
        let yaml = r#"
sources: []
artifact:
  path: out.csv
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.artifact.columns.is_empty());
    }
}
