#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation driver for segment report tables.
//!
//! Runs the [`tanshin_report`] reader over every segment table of a
//! document, joins each readable figure with its period into a
//! [`ReportRow`], and keeps a [`ReadLog`] of every stage that failed.
//! Failures never abort the caller: they are recorded as status flags and
//! reasons, and the rows that could be read are still returned.

pub mod progress;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use progress::ProgressCallback;
use tanshin_aggregate_models::{FailureStage, ReadLog, ReadOutcome, ReportRow};
use tanshin_report::{Document, ReaderConfig, SegmentReportReader, SegmentTable};

pub use tanshin_aggregate_models;

/// Number of segment tables a disclosure normally carries: one for the
/// previous period and one for the current period.
pub const DEFAULT_EXPECTED_TABLES: usize = 2;

/// Settings for a driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Vocabulary and limits of the table reader.
    pub reader: ReaderConfig,
    /// How many segment tables a document should have. Any other non-zero
    /// count is flagged but still processed.
    pub expected_tables: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            expected_tables: DEFAULT_EXPECTED_TABLES,
        }
    }
}

/// Reads every segment table of an already parsed document.
///
/// `source` labels the document in the returned log.
#[must_use]
pub fn read_document(document: &Document, source: &str, options: &DriverOptions) -> ReadOutcome {
    let reader = SegmentReportReader::new(options.reader.clone());
    let mut log = ReadLog::new(source);
    let mut rows = Vec::new();

    let tables = reader.find_segment_tables(document);
    log.tables_found = tables.len();

    if tables.is_empty() {
        log::warn!("{source}: no segment report table");
        log.record(
            None,
            FailureStage::SegmentTableNotExist,
            format!(
                "no table with a merged '{}' cell",
                reader.config().segment_marker
            ),
        );
        return ReadOutcome { rows, log };
    }

    let expected = options.expected_tables;
    if tables.len() != expected {
        let stage = if tables.len() < expected {
            FailureStage::TooLittleSegmentTable
        } else {
            FailureStage::TooMuchSegmentTables
        };
        log::warn!(
            "{source}: found {} segment table(s), expected {expected}",
            tables.len()
        );
        log.record(
            None,
            stage,
            format!("found {} segment table(s), expected {expected}", tables.len()),
        );
    }

    for table in &tables {
        read_table(&reader, table, &mut log, &mut rows);
    }

    if log.status.completed {
        log::info!("{source}: completed with {} row(s)", rows.len());
    } else {
        log::info!(
            "{source}: {} row(s), incomplete ({})",
            rows.len(),
            log.status
                .marked_stages()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    ReadOutcome { rows, log }
}

/// Extracts the rows of one table into `rows`, recording why if it cannot.
fn read_table(
    reader: &SegmentReportReader,
    table: &SegmentTable<'_>,
    log: &mut ReadLog,
    rows: &mut Vec<ReportRow>,
) {
    let index = table.index();

    let period = reader.read_table_period(table);
    let Some(kind) = period.kind else {
        log::warn!("{}: table {index} has no period label", log.source);
        log.record(
            Some(index),
            FailureStage::PeriodNotFound,
            format!(
                "no period label within {} paragraph(s) above the table",
                reader.config().period_lookback
            ),
        );
        return;
    };

    let segments = reader.read_table_segments(table);
    if segments.is_empty() {
        log::warn!("{}: table {index} has no segment columns", log.source);
        log.record(
            Some(index),
            FailureStage::SegmentNotFound,
            format!(
                "no segment columns under the '{}' header",
                reader.config().segment_marker
            ),
        );
        return;
    }

    let accounts = reader.read_table_accounts(table);
    if accounts.len() != 2 {
        log::warn!("{}: table {index} lacks a sales or profit row", log.source);
        log.record(
            Some(index),
            FailureStage::AccountNotFound,
            format!(
                "expected sales and profit rows, found [{}]",
                accounts
                    .iter()
                    .map(|account| format!("{}: {}", account.kind, account.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        );
        return;
    }

    let mut all_read = true;
    for segment in &segments {
        for account in &accounts {
            let value = reader.read_segment_value(table, segment, account);
            if let Some(row) = ReportRow::new(&period, &value) {
                rows.push(row);
            } else {
                all_read = false;
                log::warn!(
                    "{}: table {index}, {} / {} is not a number",
                    log.source,
                    segment.name,
                    account.name
                );
                log.record(
                    Some(index),
                    FailureStage::ValueReadFailed,
                    format!(
                        "{} / {} (row {}, column {}) is not a number",
                        segment.name, account.name, account.position, segment.position
                    ),
                );
            }
        }
    }

    if all_read {
        log::debug!("{}: table {index} ({kind}) fully read", log.source);
        log.complete_period(kind);
    }
}

/// Loads the document at `path` and reads it.
///
/// A missing or unreadable file is reported through
/// [`ReadStatus::read_html_failed`](tanshin_aggregate_models::ReadStatus::read_html_failed).
#[must_use]
pub fn read_financial_result(path: &Path, options: &DriverOptions) -> ReadOutcome {
    let source = path.display().to_string();

    let reason = match Document::load(path) {
        Ok(Some(document)) => return read_document(&document, &source, options),
        Ok(None) => "file does not exist".to_string(),
        Err(e) => e.to_string(),
    };

    log::warn!("{source}: failed to load: {reason}");
    let mut log = ReadLog::new(source);
    log.record(None, FailureStage::ReadHtmlFailed, reason);

    ReadOutcome {
        rows: Vec::new(),
        log,
    }
}

/// Reads many documents in order.
///
/// Returns one outcome per path, in the same order.
#[must_use]
pub fn read_financial_results(
    paths: &[PathBuf],
    options: &DriverOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Vec<ReadOutcome> {
    let progress = progress.unwrap_or_else(crate::progress::null_progress);
    progress.set_total(paths.len() as u64);

    let outcomes: Vec<ReadOutcome> = paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| {
                    name.to_string_lossy().into_owned()
                });
            progress.set_message(name);
            let outcome = read_financial_result(path, options);
            progress.inc(1);
            outcome
        })
        .collect();

    let completed = outcomes
        .iter()
        .filter(|outcome| outcome.log.status.completed)
        .count();
    progress.finish(format!(
        "Read {} document(s), {completed} completed",
        outcomes.len()
    ));

    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tanshin_aggregate_models::{ReadStatus, TableFailure};
    use tanshin_report::{AccountKind, PeriodKind};

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
    }

    fn report_fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../report/fixtures")
            .join(name)
    }

    fn read(path: &Path) -> ReadOutcome {
        read_financial_result(path, &DriverOptions::default())
    }

    #[test]
    fn complete_report_yields_all_rows() {
        let outcome = read(&report_fixture("quarterly_report.htm"));
        let status = outcome.log.status;

        assert_eq!(
            status,
            ReadStatus {
                completed: true,
                ..ReadStatus::default()
            }
        );
        assert_eq!(outcome.log.tables_found, 2);
        assert!(outcome.log.failures.is_empty());
        // 3 segments x 2 accounts x 2 periods
        assert_eq!(outcome.rows.len(), 12);

        let previous: Vec<&ReportRow> = outcome
            .rows
            .iter()
            .filter(|row| row.period_kind == PeriodKind::Previous)
            .collect();
        assert_eq!(previous.len(), 6);
        assert_eq!(previous[0].segment_name, "国内事業");
        assert_eq!(previous[0].account_kind, AccountKind::Sales);
        assert!((previous[0].value - 121_500.0).abs() < f64::EPSILON);
        assert_eq!(previous[3].segment_name, "海外事業");
        assert_eq!(previous[3].account_kind, AccountKind::Profit);
        assert!((previous[3].value + 1234.0).abs() < f64::EPSILON);

        let current_sales = outcome
            .rows
            .iter()
            .find(|row| row.period_kind == PeriodKind::Current)
            .unwrap();
        assert!((current_sales.value - 130_200.0).abs() < f64::EPSILON);
        assert_eq!(
            current_sales.period_end.map(|date| date.to_string()).as_deref(),
            Some("2022-11-30")
        );
    }

    #[test]
    fn document_without_segment_table() {
        let outcome = read(&report_fixture("no_segment_table.htm"));
        assert!(outcome.rows.is_empty());
        assert!(!outcome.log.status.read_html_failed);
        assert!(outcome.log.status.segment_table_not_exist);
        assert!(!outcome.log.status.completed);
        assert_eq!(outcome.log.tables_found, 0);
    }

    #[test]
    fn missing_file_fails_to_load() {
        let outcome = read(Path::new("xxxxx"));
        assert!(outcome.rows.is_empty());
        assert!(outcome.log.status.read_html_failed);
        assert_eq!(
            outcome.log.failures,
            [TableFailure {
                table_index: None,
                stage: FailureStage::ReadHtmlFailed,
                reason: "file does not exist".to_string(),
            }]
        );
    }

    #[test]
    fn missing_profit_row_is_account_not_found() {
        let outcome = read(&fixture("account_not_found.htm"));
        let status = outcome.log.status;
        assert!(!status.read_html_failed);
        assert!(!status.segment_table_not_exist);
        assert!(!status.period_not_found);
        assert!(!status.segment_not_found);
        assert!(status.account_not_found);
        assert!(status.too_little_segment_table);
        assert!(!status.completed);
        assert!(outcome.log.completed_periods.is_empty());
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn unreadable_value_keeps_other_rows() {
        let outcome = read(&fixture("value_read_failed.htm"));
        let status = outcome.log.status;
        assert!(!status.period_not_found);
        assert!(!status.segment_not_found);
        assert!(!status.account_not_found);
        assert!(status.value_read_failed);
        assert!(!status.completed);
        assert_eq!(outcome.log.completed_periods, [PeriodKind::Previous]);
        // one of the 8 current-period cells is unreadable
        assert_eq!(outcome.rows.len(), 15);

        let failure = outcome
            .log
            .failures
            .iter()
            .find(|f| f.stage == FailureStage::ValueReadFailed)
            .unwrap();
        assert_eq!(failure.table_index, Some(1));
        assert!(failure.reason.contains("金融事業"));
    }

    #[test]
    fn unlabeled_table_is_period_not_found() {
        let outcome = read(&fixture("period_not_found.htm"));
        let status = outcome.log.status;
        assert!(!status.segment_table_not_exist);
        assert!(status.period_not_found);
        assert!(!status.completed);
        assert_eq!(outcome.log.completed_periods, [PeriodKind::Current]);
        assert_eq!(outcome.rows.len(), 4);
        assert!(outcome.rows.iter().all(|row| row.period_kind == PeriodKind::Current));
    }

    #[test]
    fn extra_tables_are_flagged_and_still_read() {
        let outcome = read(&fixture("too_much_segment_tables.htm"));
        let status = outcome.log.status;
        assert!(status.too_much_segment_tables);
        assert!(!status.too_little_segment_table);
        assert_eq!(outcome.log.tables_found, 3);
        assert!(status.completed);
        assert_eq!(outcome.rows.len(), 12);
    }

    #[test]
    fn expected_table_count_is_configurable() {
        let options = DriverOptions {
            expected_tables: 3,
            ..DriverOptions::default()
        };
        let outcome = read_financial_result(&fixture("too_much_segment_tables.htm"), &options);
        assert!(!outcome.log.status.too_much_segment_tables);
        assert!(!outcome.log.status.too_little_segment_table);
    }

    #[test]
    fn shift_jis_reads_like_utf8() {
        let source = include_str!("../../report/fixtures/quarterly_report.htm");
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(source);

        let path = std::env::temp_dir().join(format!(
            "tanshin_aggregate_sjis_{}.htm",
            std::process::id()
        ));
        std::fs::write(&path, &bytes).unwrap();
        let sjis = read(&path);
        std::fs::remove_file(&path).unwrap();

        let utf8 = read(&report_fixture("quarterly_report.htm"));
        assert_eq!(sjis.rows, utf8.rows);
        assert_eq!(sjis.log.status, utf8.log.status);
    }

    #[test]
    fn reading_twice_is_identical() {
        let document = Document::parse(include_str!("../../report/fixtures/quarterly_report.htm"));
        let options = DriverOptions::default();
        let first = read_document(&document, "quarterly_report.htm", &options);
        let second = read_document(&document, "quarterly_report.htm", &options);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.events.lock().unwrap().push(format!("total {total}"));
        }

        fn inc(&self, delta: u64) {
            self.events.lock().unwrap().push(format!("inc {delta}"));
        }

        fn set_message(&self, msg: String) {
            self.events.lock().unwrap().push(msg);
        }

        fn finish(&self, msg: String) {
            self.events.lock().unwrap().push(msg);
        }
    }

    #[test]
    fn batch_reports_progress_in_order() {
        let progress = Arc::new(RecordingProgress {
            events: Mutex::new(Vec::new()),
        });
        let paths = [
            report_fixture("quarterly_report.htm"),
            PathBuf::from("missing.htm"),
        ];

        let callback: Arc<dyn ProgressCallback> = progress.clone();
        let outcomes = read_financial_results(&paths, &DriverOptions::default(), Some(callback));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].log.status.completed);
        assert!(outcomes[1].log.status.read_html_failed);
        assert_eq!(outcomes[1].log.source, "missing.htm");

        let events = progress.events.lock().unwrap();
        assert_eq!(
            *events,
            [
                "total 2",
                "quarterly_report.htm",
                "inc 1",
                "missing.htm",
                "inc 1",
                "Read 2 document(s), 1 completed",
            ]
        );
    }
}
