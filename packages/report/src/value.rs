//! Reading the figure at a segment/account intersection.

use tanshin_report_models::{Account, Segment, SegmentValue};

use crate::SegmentReportReader;
use crate::document::CellNode;
use crate::locate::SegmentTable;
use crate::patterns::parse_amount;

impl SegmentReportReader {
    /// Reads the value of `segment` in the row of `account`.
    ///
    /// A blank, non-numeric or missing cell yields a record whose `value` is
    /// `None`.
    #[must_use]
    pub fn read_segment_value(
        &self,
        table: &SegmentTable<'_>,
        segment: &Segment,
        account: &Account,
    ) -> SegmentValue {
        let text = table
            .rows()
            .get(account.position)
            .and_then(|row| SegmentTable::cells(*row).get(segment.position).copied())
            .map(|cell| cell.text_content())
            .unwrap_or_default();

        let value = parse_amount(&text);
        if value.is_none() {
            log::debug!(
                "Table {}: '{}' / '{}' is not a number: {text:?}",
                table.index(),
                segment.name,
                account.name
            );
        }

        SegmentValue::new(segment, account, value)
    }
}

#[cfg(test)]
mod tests {
    use tanshin_report_models::{AccountKind, UnitScale};

    use super::*;
    use crate::Document;

    const TABLE: &str = r#"<table>
        <tr><td rowspan="2"></td><td colspan="3">報告セグメント</td></tr>
        <tr><td>A事業</td><td>B事業</td><td>C事業</td></tr>
        <tr><td>売上高</td><td>5,678</td><td> - </td><td>n/a</td></tr>
        <tr><td>セグメント損失</td><td>△1,234</td><td>
            12 </td></tr>
    </table>"#;

    fn segment(position: usize) -> Segment {
        Segment {
            order: position - 1,
            position,
            name: format!("S{position}"),
        }
    }

    fn read(position: usize, row: usize) -> SegmentValue {
        let reader = SegmentReportReader::default();
        let document = Document::parse(TABLE);
        let tables = reader.find_segment_tables(&document);
        let account = Account::new(AccountKind::Sales, row, "売上高", UnitScale::Million);
        reader.read_segment_value(&tables[0], &segment(position), &account)
    }

    #[test]
    fn parses_thousands_separators() {
        assert_eq!(read(1, 2).value, Some(5678.0));
    }

    #[test]
    fn negative_glyph_becomes_minus() {
        assert_eq!(read(1, 3).value, Some(-1234.0));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(read(2, 3).value, Some(12.0));
    }

    #[test]
    fn dash_and_text_are_unavailable() {
        assert!(read(2, 2).is_unavailable());
        assert!(read(3, 2).is_unavailable());
    }

    #[test]
    fn out_of_range_cell_is_unavailable() {
        assert!(read(3, 3).is_unavailable());
        assert!(read(1, 9).is_unavailable());
    }

    #[test]
    fn record_carries_metadata() {
        let value = read(1, 2);
        assert_eq!(value.segment_name, "S1");
        assert_eq!(value.segment_position, 1);
        assert_eq!(value.account_position, 2);
        assert_eq!(value.account_name, "売上高");
    }
}
