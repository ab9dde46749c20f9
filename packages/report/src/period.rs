//! Reporting period lookup.
//!
//! Disclosures label each segment table with a paragraph such as
//! `当第3四半期連結累計期間(自 2022年3月1日 至 2022年11月30日)` a few
//! blocks above it. The nearest matching paragraph wins.

use tanshin_report_models::Period;

use crate::SegmentReportReader;
use crate::document::CellNode;
use crate::locate::SegmentTable;
use crate::patterns::{extract_two_dates, period_kind};

impl SegmentReportReader {
    /// Reads the reporting period of a segment table.
    ///
    /// Returns a [`Period`] with no `kind` when none of the nearest
    /// paragraphs (up to the configured lookback) is a period label.
    #[must_use]
    pub fn read_table_period(&self, table: &SegmentTable<'_>) -> Period {
        let document = table.document();
        let mut anchor = table.element();

        for _ in 0..self.config().period_lookback {
            let Some(block) = document.preceding(anchor, "p") else {
                break;
            };

            let text = block.text_content().trim().to_owned();
            if let Some(kind) = period_kind(&text) {
                let (begin, end) = extract_two_dates(&text).unzip();
                log::debug!("Table {}: {kind} period from '{text}'", table.index());
                return Period {
                    kind: Some(kind),
                    description: text,
                    begin,
                    end,
                };
            }

            anchor = block;
        }

        log::debug!("Table {}: no period label found", table.index());
        Period::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tanshin_report_models::PeriodKind;

    use crate::{Document, SegmentReportReader};

    fn periods(html: &str) -> Vec<tanshin_report_models::Period> {
        let reader = SegmentReportReader::default();
        let document = Document::parse(html);
        reader
            .find_segment_tables(&document)
            .iter()
            .map(|table| reader.read_table_period(table))
            .collect()
    }

    const TABLE: &str = r#"<table>
        <tr><td rowspan="2"></td><td colspan="2">報告セグメント</td></tr>
        <tr><td>A事業</td><td>B事業</td></tr>
    </table>"#;

    #[test]
    fn reads_previous_and_current_periods() {
        let periods = periods(include_str!("../fixtures/quarterly_report.htm"));
        assert_eq!(periods.len(), 2);

        assert_eq!(periods[0].kind, Some(PeriodKind::Previous));
        assert_eq!(periods[0].begin, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(periods[0].end, NaiveDate::from_ymd_opt(2021, 11, 30));

        assert_eq!(periods[1].kind, Some(PeriodKind::Current));
        assert_eq!(periods[1].begin, NaiveDate::from_ymd_opt(2022, 3, 1));
        assert_eq!(periods[1].end, NaiveDate::from_ymd_opt(2022, 11, 30));
        assert!(periods[1].description.contains("当第3四半期連結累計期間"));
    }

    #[test]
    fn label_beyond_lookback_is_not_found() {
        let html = format!(
            "<p>当期(自 2022年3月1日 至 2023年2月28日)</p><p>a</p><p>b</p><p>c</p>{TABLE}"
        );
        let periods = periods(&html);
        assert_eq!(periods.len(), 1);
        assert!(!periods[0].is_found());
        assert!(periods[0].description.is_empty());
        assert!(periods[0].begin.is_none());
    }

    #[test]
    fn label_within_lookback_is_found() {
        let html = format!("<p>当期(自 2022年3月1日 至 2023年2月28日)</p><p>a</p><p>b</p>{TABLE}");
        let periods = periods(&html);
        assert_eq!(periods[0].kind, Some(PeriodKind::Current));
    }

    #[test]
    fn malformed_dates_keep_kind() {
        let html = format!("<p>前期(自 2021年3月1日 至 2021年2月30日)</p>{TABLE}");
        let periods = periods(&html);
        assert_eq!(periods[0].kind, Some(PeriodKind::Previous));
        assert!(periods[0].begin.is_none());
        assert!(periods[0].end.is_none());
    }

    #[test]
    fn no_paragraphs_is_not_found() {
        let periods = periods(TABLE);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].kind, None);
    }
}
