#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output records of the segment report aggregation driver.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tanshin_report_models::{AccountKind, Period, PeriodKind, SegmentValue, UnitScale};

/// One extracted figure together with the period it belongs to.
///
/// Flat so that it serializes to a single CSV record or JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub period_kind: PeriodKind,
    pub period_description: String,
    pub period_begin: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub segment_order: usize,
    pub segment_position: usize,
    pub segment_name: String,
    pub account_order: usize,
    pub account_position: usize,
    pub account_kind: AccountKind,
    pub account_name: String,
    pub account_unit: UnitScale,
    /// Number as printed, in units of `account_unit`.
    pub value: f64,
}

impl ReportRow {
    /// Joins a period with a value read from its table.
    ///
    /// Returns `None` if the period was not recognized or the value could
    /// not be read.
    #[must_use]
    pub fn new(period: &Period, value: &SegmentValue) -> Option<Self> {
        Some(Self {
            period_kind: period.kind?,
            period_description: period.description.clone(),
            period_begin: period.begin,
            period_end: period.end,
            segment_order: value.segment_order,
            segment_position: value.segment_position,
            segment_name: value.segment_name.clone(),
            account_order: value.account_order,
            account_position: value.account_position,
            account_kind: value.account_kind,
            account_name: value.account_name.clone(),
            account_unit: value.account_unit,
            value: value.value?,
        })
    }

    /// The value multiplied by the account's unit, in yen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scaled_value(&self) -> f64 {
        self.value * self.account_unit.multiplier() as f64
    }
}

/// The stage at which reading a document or table went wrong.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureStage {
    /// The document could not be loaded.
    ReadHtmlFailed,
    /// The document has no segment report table.
    SegmentTableNotExist,
    /// Fewer segment tables than expected.
    TooLittleSegmentTable,
    /// More segment tables than expected.
    TooMuchSegmentTables,
    /// A table has no recognizable period label.
    PeriodNotFound,
    /// A table has no segment columns.
    SegmentNotFound,
    /// A table lacks its sales or profit row.
    AccountNotFound,
    /// A segment/account cell is not numeric.
    ValueReadFailed,
}

impl FailureStage {
    /// Whether documents flagged with this stage still produce rows.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(
            self,
            Self::TooLittleSegmentTable | Self::TooMuchSegmentTables | Self::ValueReadFailed
        )
    }
}

/// One flag per failure stage, plus the overall completion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReadStatus {
    pub read_html_failed: bool,
    pub segment_table_not_exist: bool,
    pub too_little_segment_table: bool,
    pub too_much_segment_tables: bool,
    pub period_not_found: bool,
    pub segment_not_found: bool,
    pub account_not_found: bool,
    pub value_read_failed: bool,
    /// Both the previous and the current period were fully extracted.
    pub completed: bool,
}

impl ReadStatus {
    const fn flag_mut(&mut self, stage: FailureStage) -> &mut bool {
        match stage {
            FailureStage::ReadHtmlFailed => &mut self.read_html_failed,
            FailureStage::SegmentTableNotExist => &mut self.segment_table_not_exist,
            FailureStage::TooLittleSegmentTable => &mut self.too_little_segment_table,
            FailureStage::TooMuchSegmentTables => &mut self.too_much_segment_tables,
            FailureStage::PeriodNotFound => &mut self.period_not_found,
            FailureStage::SegmentNotFound => &mut self.segment_not_found,
            FailureStage::AccountNotFound => &mut self.account_not_found,
            FailureStage::ValueReadFailed => &mut self.value_read_failed,
        }
    }

    /// Raises the flag of `stage`.
    pub const fn mark(&mut self, stage: FailureStage) {
        *self.flag_mut(stage) = true;
    }

    /// Whether the flag of `stage` is raised.
    #[must_use]
    pub const fn is_marked(&self, stage: FailureStage) -> bool {
        match stage {
            FailureStage::ReadHtmlFailed => self.read_html_failed,
            FailureStage::SegmentTableNotExist => self.segment_table_not_exist,
            FailureStage::TooLittleSegmentTable => self.too_little_segment_table,
            FailureStage::TooMuchSegmentTables => self.too_much_segment_tables,
            FailureStage::PeriodNotFound => self.period_not_found,
            FailureStage::SegmentNotFound => self.segment_not_found,
            FailureStage::AccountNotFound => self.account_not_found,
            FailureStage::ValueReadFailed => self.value_read_failed,
        }
    }

    /// Every raised failure flag, in pipeline order.
    #[must_use]
    pub fn marked_stages(&self) -> Vec<FailureStage> {
        FailureStage::iter()
            .filter(|stage| self.is_marked(*stage))
            .collect()
    }
}

/// Why a document or one of its tables did not yield rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFailure {
    /// 0-based segment table index. `None` for document-level failures.
    pub table_index: Option<usize>,
    pub stage: FailureStage,
    pub reason: String,
}

/// Everything the driver has to say about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadLog {
    /// Path or other label identifying the document.
    pub source: String,
    pub status: ReadStatus,
    /// Number of segment report tables found.
    pub tables_found: usize,
    /// Period kinds whose tables were read without any failure.
    pub completed_periods: Vec<PeriodKind>,
    pub failures: Vec<TableFailure>,
}

impl ReadLog {
    /// Creates an empty log for `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: ReadStatus::default(),
            tables_found: 0,
            completed_periods: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Records a failure and raises its status flag.
    pub fn record(&mut self, table_index: Option<usize>, stage: FailureStage, reason: String) {
        self.status.mark(stage);
        self.failures.push(TableFailure {
            table_index,
            stage,
            reason,
        });
    }

    /// Records that every value of a `kind` table was read.
    ///
    /// Sets `completed` once both period kinds are in.
    pub fn complete_period(&mut self, kind: PeriodKind) {
        if !self.completed_periods.contains(&kind) {
            self.completed_periods.push(kind);
            self.completed_periods.sort_unstable();
        }
        self.status.completed = PeriodKind::iter().all(|k| self.completed_periods.contains(&k));
    }
}

/// Rows extracted from one document and the log of how it went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOutcome {
    pub rows: Vec<ReportRow>,
    pub log: ReadLog,
}
