//! Segment report table discovery.

use scraper::ElementRef;

use crate::SegmentReportReader;
use crate::document::{CELL_SELECTOR, COLSPAN, CellNode, Document, ROW_SELECTOR};

/// A table recognized as a segment report, tied to its document.
#[derive(Debug, Clone, Copy)]
pub struct SegmentTable<'a> {
    document: &'a Document,
    element: ElementRef<'a>,
    index: usize,
}

impl<'a> SegmentTable<'a> {
    /// The document the table belongs to.
    #[must_use]
    pub const fn document(&self) -> &'a Document {
        self.document
    }

    /// The `<table>` element.
    #[must_use]
    pub const fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// 0-based rank among the segment tables of the document.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Every `<tr>` under the table, nested tables included.
    #[must_use]
    pub fn rows(&self) -> Vec<ElementRef<'a>> {
        self.element.select(&ROW_SELECTOR).collect()
    }

    /// Every `<td>` under `row`.
    #[must_use]
    pub fn cells(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        row.select(&CELL_SELECTOR).collect()
    }
}

impl SegmentReportReader {
    /// Finds the segment report tables of a document, in document order.
    ///
    /// A table qualifies when it contains the segment marker as a text node
    /// and the nearest cell at or before that text is merged across columns.
    /// A plain mention of the marker elsewhere does not qualify.
    #[must_use]
    pub fn find_segment_tables<'a>(&self, document: &'a Document) -> Vec<SegmentTable<'a>> {
        let marker = self.config().segment_marker.as_str();

        let tables: Vec<SegmentTable<'a>> = document
            .tables()
            .into_iter()
            .filter(|table| {
                document
                    .preceding_text(*table, marker, "td")
                    .is_some_and(|cell| cell.has_attribute(COLSPAN))
            })
            .enumerate()
            .map(|(index, element)| SegmentTable {
                document,
                element,
                index,
            })
            .collect();

        log::debug!("Found {} segment report table(s)", tables.len());

        tables
    }
}
