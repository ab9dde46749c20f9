//! The `extract` and `inspect` commands, shared by the subcommand and
//! interactive front ends.

use std::path::{Path, PathBuf};

use tanshin_aggregate::read_financial_results;
use tanshin_aggregate::tanshin_aggregate_models::{ReadLog, ReportRow};
use tanshin_cli_utils::{IndicatifProgress, MultiProgress};
use tanshin_report::{Document, SegmentReportReader};

use crate::config::TanshinConfig;
use crate::input::collect_documents;
use crate::output::{self, OutputFormat};

/// Arguments of an extraction run.
pub struct ExtractArgs {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub expected_tables: Option<usize>,
    /// Where to write the read logs as JSON. Summarized on stderr if unset.
    pub log: Option<PathBuf>,
}

/// Reads every document, prints the rows to stdout and reports the logs.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed or output cannot be
/// written. Extraction failures are reported in the logs instead.
pub fn extract(
    multi: &MultiProgress,
    config: &TanshinConfig,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = collect_documents(&args.paths)?;
    if documents.is_empty() {
        log::warn!("No disclosure files found");
    }

    let options = config.driver_options(args.expected_tables);
    let progress = IndicatifProgress::documents_bar(multi, "Reading disclosures...");
    let outcomes = read_financial_results(&documents, &options, Some(progress));

    let rows: Vec<&ReportRow> = outcomes.iter().flat_map(|o| &o.rows).collect();
    output::write_rows(&rows, args.format, std::io::stdout().lock())?;

    let logs: Vec<&ReadLog> = outcomes.iter().map(|o| &o.log).collect();
    if let Some(path) = &args.log {
        let file = std::fs::File::create(path)?;
        output::write_logs_json(&logs, std::io::BufWriter::new(file))?;
        log::info!("Wrote read logs to {}", path.display());
    } else {
        output::write_summary(&logs, std::io::stderr().lock())?;
    }

    Ok(())
}

/// Prints what the reader sees in each segment table of one document.
///
/// # Errors
///
/// Returns an error if the document does not exist or cannot be read.
pub fn inspect(config: &TanshinConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let Some(document) = Document::load(path)? else {
        return Err(format!("{} does not exist", path.display()).into());
    };

    let reader = SegmentReportReader::new(config.reader.clone());
    output::write_inspection(&document, &reader, std::io::stdout().lock())?;

    Ok(())
}
