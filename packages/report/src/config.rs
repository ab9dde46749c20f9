//! Reader configuration.
//!
//! The defaults match Japanese quarterly and annual earnings disclosures.
//! Every field can be overridden from TOML; missing fields keep their
//! default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ReportError;

/// Tunable vocabulary and search limits for [`crate::SegmentReportReader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Text of the merged header cell spanning the segment columns.
    pub segment_marker: String,
    /// Text identifying the merged cell that states the denomination.
    pub unit_marker: String,
    /// Maximum number of paragraphs searched above a table for its period.
    pub period_lookback: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            segment_marker: "報告セグメント".to_owned(),
            unit_marker: "単位".to_owned(),
            period_lookback: 3,
        }
    }
}

impl ReaderConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ReportError> {
        toml::de::from_str(toml_str).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be read, or
    /// [`ReportError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let toml_str = include_str!("../config/default.toml");
        let config = ReaderConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let config = ReaderConfig::from_toml_str("period_lookback = 5").unwrap();
        assert_eq!(config.period_lookback, 5);
        assert_eq!(config.segment_marker, "報告セグメント");
        assert_eq!(config.unit_marker, "単位");
    }

    #[test]
    fn rejects_wrong_types() {
        let err = ReaderConfig::from_toml_str("period_lookback = \"three\"").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
