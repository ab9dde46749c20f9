//! Rendering of rows, read logs and table inspections.

use std::io::Write;

use clap::ValueEnum;
use tanshin_aggregate::tanshin_aggregate_models::{ReadLog, ReportRow};
use tanshin_report::{Document, SegmentReportReader};

/// Format of the rows written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A pretty-printed JSON array.
    Json,
    /// CSV with a header record.
    Csv,
}

/// Writes extracted rows.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_rows<W: Write>(
    rows: &[&ReportRow],
    format: OutputFormat,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for row in rows {
                csv.serialize(row)?;
            }
            csv.flush()?;
        }
    }

    Ok(())
}

/// Writes every read log as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_logs_json<W: Write>(
    logs: &[&ReadLog],
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut writer, logs)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes one line per document followed by its failure reasons.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary<W: Write>(logs: &[&ReadLog], mut writer: W) -> std::io::Result<()> {
    for log in logs {
        let status = if log.status.completed {
            "completed".to_string()
        } else {
            log.status
                .marked_stages()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        writeln!(
            writer,
            "{}\ttables={}\t{status}",
            log.source, log.tables_found
        )?;

        for failure in &log.failures {
            match failure.table_index {
                Some(index) => writeln!(
                    writer,
                    "  table {index}: {}: {}",
                    failure.stage, failure.reason
                )?,
                None => writeln!(writer, "  {}: {}", failure.stage, failure.reason)?,
            }
        }
    }

    let completed = logs.iter().filter(|log| log.status.completed).count();
    writeln!(writer, "{completed}/{} document(s) completed", logs.len())
}

/// Writes the period, segments and accounts the reader sees in every
/// segment table of `document`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_inspection<W: Write>(
    document: &Document,
    reader: &SegmentReportReader,
    mut writer: W,
) -> std::io::Result<()> {
    let tables = reader.find_segment_tables(document);
    if tables.is_empty() {
        return writeln!(writer, "No segment report table found");
    }

    for table in &tables {
        writeln!(writer, "Table {}", table.index())?;

        let period = reader.read_table_period(table);
        match (period.kind, period.begin, period.end) {
            (Some(kind), Some(begin), Some(end)) => {
                writeln!(writer, "  period: {kind} {begin}..{end}")?;
            }
            (Some(kind), _, _) => writeln!(writer, "  period: {kind} (dates unreadable)")?,
            (None, _, _) => writeln!(writer, "  period: not found")?,
        }
        if !period.description.is_empty() {
            writeln!(writer, "    {}", period.description)?;
        }

        let segments = reader.read_table_segments(table);
        if segments.is_empty() {
            writeln!(writer, "  segments: not found")?;
        }
        for segment in &segments {
            writeln!(
                writer,
                "  segment {} (column {}): {}",
                segment.order, segment.position, segment.name
            )?;
        }

        let accounts = reader.read_table_accounts(table);
        if accounts.is_empty() {
            writeln!(writer, "  accounts: not found")?;
        }
        for account in &accounts {
            writeln!(
                writer,
                "  {} (row {}, x{}): {}",
                account.kind,
                account.position,
                account.unit.multiplier(),
                account.name
            )?;
        }
    }

    Ok(())
}
