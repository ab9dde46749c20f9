//! Segment column discovery.

use tanshin_report_models::Segment;

use crate::SegmentReportReader;
use crate::document::{CellNode, COLSPAN, MERGED_CELL_SELECTOR, ROWSPAN};
use crate::locate::SegmentTable;
use crate::patterns::is_total_column_label;

impl SegmentReportReader {
    /// Reads the segment columns of a table, left to right.
    ///
    /// The merged marker cell spans the segment columns; the row after it
    /// names them. Cells to the left of the marker shift the segment
    /// columns right, and cells merged down from the marker row shift the
    /// positions of the body cells. Total columns and blank labels are
    /// dropped.
    ///
    /// Returns an empty list when the table has no merged marker cell.
    #[must_use]
    pub fn read_table_segments(&self, table: &SegmentTable<'_>) -> Vec<Segment> {
        let marker = self.config().segment_marker.as_str();
        let document = table.document();

        let Some(marker_cell) = table
            .element()
            .select(&MERGED_CELL_SELECTOR)
            .find(|cell| cell.text_content().contains(marker))
        else {
            log::debug!("Table {}: no merged '{marker}' cell", table.index());
            return Vec::new();
        };

        let Some(width) = marker_cell.span(COLSPAN) else {
            log::debug!(
                "Table {}: unreadable colspan {:?} on the segment header",
                table.index(),
                marker_cell.attribute(COLSPAN)
            );
            return Vec::new();
        };

        let Some(header_row) = document.preceding(marker_cell, "tr") else {
            return Vec::new();
        };

        let mut segment_begin = 0;
        let mut skipped = 0;
        for cell in SegmentTable::cells(header_row) {
            if cell.id() == marker_cell.id() {
                break;
            }
            if cell.has_attribute(ROWSPAN) {
                skipped += 1;
            } else {
                segment_begin += 1;
            }
        }

        let Some(name_row) = document.following(marker_cell, "tr") else {
            log::debug!("Table {}: no row after the segment header", table.index());
            return Vec::new();
        };

        let segments: Vec<Segment> = SegmentTable::cells(name_row)
            .into_iter()
            .enumerate()
            .skip(segment_begin)
            .take(width)
            .map(|(i, cell)| (i + skipped, cell.normalized_text()))
            .filter(|(_, name)| !name.is_empty() && !is_total_column_label(name))
            .enumerate()
            .map(|(order, (position, name))| Segment {
                order,
                position,
                name,
            })
            .collect();

        log::debug!(
            "Table {}: {} segment(s) in {width} column(s)",
            table.index(),
            segments.len()
        );

        segments
    }
}
