#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Segment report reader for Japanese earnings disclosures (決算短信).
//!
//! Disclosures publish sales and profit per business segment in an HTML
//! table with no semantic markup. The reader recovers the table's structure
//! from cell text, merged-cell spans and document order:
//!
//! 1. [`SegmentReportReader::find_segment_tables`] picks out the segment
//!    report tables of a [`Document`].
//! 2. [`SegmentReportReader::read_table_period`],
//!    [`SegmentReportReader::read_table_segments`] and
//!    [`SegmentReportReader::read_table_accounts`] locate the period label,
//!    the segment columns and the sales/profit rows of one table.
//! 3. [`SegmentReportReader::read_segment_value`] reads the figure at one
//!    segment/account intersection.
//!
//! Nothing past [`Document::load`] returns an error. A structure that cannot
//! be found comes back as an unset period, an empty list or a `None` value.

pub mod account;
pub mod config;
pub mod document;
pub mod locate;
pub mod patterns;
pub mod period;
pub mod segment;
pub mod value;

pub use account::AccountState;
pub use config::ReaderConfig;
pub use document::{CellNode, Document};
pub use locate::SegmentTable;
pub use tanshin_report_models::{
    Account, AccountKind, Period, PeriodKind, Segment, SegmentValue, UnitScale,
};

/// Errors that can occur while loading documents or configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// The document bytes are neither UTF-8 nor Shift_JIS.
    #[error("Could not decode {path} as UTF-8 or Shift_JIS")]
    Decode {
        /// The file that failed to decode.
        path: String,
    },
}

/// Reads segment report tables using a fixed [`ReaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct SegmentReportReader {
    config: ReaderConfig,
}

impl SegmentReportReader {
    /// Creates a reader with the given configuration.
    #[must_use]
    pub const fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// The configuration this reader was created with.
    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }
}
