//! Sales and profit row discovery.
//!
//! The first labeled row of a segment table is the sales heading. Its
//! figures are usually broken down into external and inter-segment rows
//! followed by a total row, which is where the sales figures actually sit.
//! The first labeled row after that is the profit row.

use tanshin_report_models::{Account, AccountKind, UnitScale};

use crate::SegmentReportReader;
use crate::document::{CELL_SELECTOR, CellNode, MERGED_CELL_SELECTOR, ROWSPAN};
use crate::locate::SegmentTable;
use crate::patterns::{is_total_row_label, unit_scale};

/// Progress of the sales/profit classification over a table's rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountState {
    /// No labeled row seen yet.
    #[default]
    AwaitingSales,
    /// A sales candidate exists; the next non-total label is profit.
    AwaitingProfit { sales: Account },
    /// Both rows found. Only a total row can reopen the sales candidate.
    Classified { sales: Account, profit: Account },
}

impl AccountState {
    /// Feeds the non-empty label of row `position` into the state machine.
    #[must_use]
    pub fn next(self, position: usize, label: &str, unit: UnitScale) -> Self {
        match self {
            Self::AwaitingSales => Self::AwaitingProfit {
                sales: Account::new(AccountKind::Sales, position, label, unit),
            },
            Self::AwaitingProfit { sales } | Self::Classified { sales, .. }
                if is_total_row_label(label) =>
            {
                Self::AwaitingProfit {
                    sales: Account { position, ..sales },
                }
            }
            Self::AwaitingProfit { sales } => Self::Classified {
                sales,
                profit: Account::new(AccountKind::Profit, position, label, unit),
            },
            classified @ Self::Classified { .. } => classified,
        }
    }

    /// The accounts found so far, sales first.
    #[must_use]
    pub fn into_accounts(self) -> Vec<Account> {
        match self {
            Self::AwaitingSales => Vec::new(),
            Self::AwaitingProfit { sales } => vec![sales],
            Self::Classified { sales, profit } => vec![sales, profit],
        }
    }
}

impl SegmentReportReader {
    /// Reads the denomination stated in the table's unit annotation.
    ///
    /// Defaults to millions of yen when the table has no merged unit cell.
    #[must_use]
    pub fn read_table_unit(&self, table: &SegmentTable<'_>) -> UnitScale {
        let marker = self.config().unit_marker.as_str();

        table
            .element()
            .select(&MERGED_CELL_SELECTOR)
            .map(|cell| cell.text_content())
            .find(|text| text.contains(marker))
            .map_or_else(UnitScale::default, |text| unit_scale(&text))
    }

    /// Reads the sales and profit rows of a table.
    ///
    /// Returns `[sales, profit]` when both were found, otherwise whatever
    /// was found (possibly nothing).
    #[must_use]
    pub fn read_table_accounts(&self, table: &SegmentTable<'_>) -> Vec<Account> {
        let document = table.document();
        let unit = self.read_table_unit(table);

        let mut state = AccountState::default();
        let mut skip_rows = 0;

        for (position, row) in table.rows().into_iter().enumerate() {
            if skip_rows > 0 {
                skip_rows -= 1;
                continue;
            }

            let Some(label_cell) = row
                .select(&CELL_SELECTOR)
                .next()
                .or_else(|| document.following(row, "td"))
            else {
                break;
            };

            if let Some(rows) = label_cell.span(ROWSPAN) {
                skip_rows = rows.saturating_sub(1);
            }

            let label = label_cell.normalized_text();
            if !label.is_empty() {
                state = state.next(position, &label, unit);
            }
        }

        let accounts = state.into_accounts();
        log::debug!(
            "Table {}: accounts {:?} ({} unit)",
            table.index(),
            accounts.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            unit.multiplier()
        );

        accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn accounts(html: &str) -> Vec<Vec<Account>> {
        let reader = SegmentReportReader::default();
        let document = Document::parse(html);
        reader
            .find_segment_tables(&document)
            .iter()
            .map(|table| reader.read_table_accounts(table))
            .collect()
    }

    const HEADER: &str = r#"<tr><td rowspan="2"></td><td colspan="2">報告セグメント</td></tr>
        <tr><td>A事業</td><td>B事業</td></tr>"#;

    #[test]
    fn total_row_confirms_sales() {
        let tables = accounts(include_str!("../fixtures/quarterly_report.htm"));
        assert_eq!(tables.len(), 2);

        for accounts in &tables {
            assert_eq!(accounts.len(), 2);
            assert_eq!(accounts[0].kind, AccountKind::Sales);
            assert_eq!(accounts[0].order, 0);
            assert_eq!(accounts[0].name, "売上高");
            assert_eq!(accounts[0].position, 6);
            assert_eq!(accounts[1].kind, AccountKind::Profit);
            assert_eq!(accounts[1].order, 1);
            assert_eq!(accounts[1].name, "セグメント利益又は損失(△)");
            assert_eq!(accounts[1].position, 7);
            assert_eq!(accounts[1].unit, UnitScale::Million);
        }
    }

    #[test]
    fn sales_only_table_yields_one_account() {
        let tables = accounts(&format!(
            "<table>{HEADER}<tr><td>売上高</td><td>1</td><td>2</td></tr></table>"
        ));
        let accounts = &tables[0];
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].kind, AccountKind::Sales);
        assert_eq!(accounts[0].position, 2);
    }

    #[test]
    fn rows_without_total_take_first_two_labels() {
        let tables = accounts(&format!(
            "<table>{HEADER}\
             <tr><td>売上高</td><td>1</td><td>2</td></tr>\
             <tr><td>セグメント利益</td><td>3</td><td>4</td></tr>\
             <tr><td>セグメント資産</td><td>5</td><td>6</td></tr></table>"
        ));
        let accounts = &tables[0];
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].position, 2);
        assert_eq!(accounts[1].name, "セグメント利益");
        assert_eq!(accounts[1].position, 3);
    }

    #[test]
    fn row_spanned_label_skips_covered_rows() {
        let tables = accounts(&format!(
            "<table>{HEADER}\
             <tr><td rowspan=\"2\">売上高</td><td>1</td><td>2</td></tr>\
             <tr><td>3</td><td>4</td></tr>\
             <tr><td>営業利益</td><td>5</td><td>6</td></tr></table>"
        ));
        let accounts = &tables[0];
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].name, "営業利益");
        assert_eq!(accounts[1].position, 4);
    }

    #[test]
    fn thousand_yen_annotation_sets_unit() {
        let tables = accounts(&format!(
            "<table><tr><td colspan=\"3\">(単位:千円)</td></tr>{HEADER}\
             <tr><td>売上高</td><td>1</td><td>2</td></tr></table>"
        ));
        assert_eq!(tables[0][0].unit, UnitScale::Thousand);
    }

    #[test]
    fn total_row_after_profit_reopens_sales() {
        let unit = UnitScale::Million;
        let state = AccountState::default()
            .next(2, "売上高", unit)
            .next(3, "営業利益", unit)
            .next(4, "合計", unit);

        let accounts = state.into_accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "売上高");
        assert_eq!(accounts[0].position, 4);
    }

    #[test]
    fn classified_state_ignores_later_labels() {
        let unit = UnitScale::Billion;
        let state = AccountState::default()
            .next(1, "売上収益", unit)
            .next(2, "調整後営業利益", unit)
            .next(3, "減価償却費", unit);

        let AccountState::Classified { sales, profit } = state else {
            panic!("expected both accounts");
        };
        assert_eq!(sales.position, 1);
        assert_eq!(profit.position, 2);
        assert_eq!(profit.unit, UnitScale::Billion);
    }

    #[test]
    fn first_label_is_sales_even_when_total() {
        let state = AccountState::default().next(0, "売上高計", UnitScale::Million);
        assert_eq!(
            state,
            AccountState::AwaitingProfit {
                sales: Account::new(AccountKind::Sales, 0, "売上高計", UnitScale::Million),
            }
        );
    }
}
