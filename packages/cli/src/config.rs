//! `tanshin.toml` settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tanshin_aggregate::{DEFAULT_EXPECTED_TABLES, DriverOptions};
use tanshin_report::{ReaderConfig, ReportError};

/// Settings read from a `tanshin.toml` file.
///
/// Every key is optional; command-line flags override file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TanshinConfig {
    /// Table reader vocabulary (`[reader]` table).
    pub reader: ReaderConfig,
    /// Expected number of segment tables per document.
    pub expected_tables: usize,
}

impl Default for TanshinConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            expected_tables: DEFAULT_EXPECTED_TABLES,
        }
    }
}

impl TanshinConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the text cannot be parsed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ReportError> {
        toml::de::from_str(toml_str).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Reads the file at `path`, or returns the defaults when no path is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ReportError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        log::debug!("Loading config from {}", path.display());
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    /// Builds driver options, letting `expected_tables` override the file.
    #[must_use]
    pub fn driver_options(&self, expected_tables: Option<usize>) -> DriverOptions {
        DriverOptions {
            reader: self.reader.clone(),
            expected_tables: expected_tables.unwrap_or(self.expected_tables),
        }
    }
}
