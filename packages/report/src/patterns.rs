//! Text classification rules for segment report tables.
//!
//! Every label-level decision the reader makes goes through one of the
//! predicates here, so the vocabulary of the disclosures lives in one place.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tanshin_report_models::{PeriodKind, UnitScale};

/// A period label: a previous/current marker followed by two dates.
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(前|当).+\d{4}年\d+月\d+日.+\d{4}年\d+月\d+日").expect("valid period regex")
});

/// A single `YYYY年M月D日` date.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})年(\d+)月(\d+)日").expect("valid date regex"));

/// A total column header such as `計`, `合計` or `小計`.
static TOTAL_COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{0,2}計$").expect("valid total column regex"));

/// A total row label: anything ending in `計`.
static TOTAL_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"計$").expect("valid total row regex"));

const PREVIOUS_MARKER: char = '前';
const CURRENT_MARKER: char = '当';

const THOUSAND_YEN: &str = "千円";
const BILLION_YEN: &str = "十億";

/// Glyph used for negative amounts.
const NEGATIVE_GLYPH: char = '△';

/// Removes every whitespace character, including line breaks and no-break
/// spaces.
#[must_use]
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether a segment column header names a subtotal or total column.
#[must_use]
pub fn is_total_column_label(label: &str) -> bool {
    TOTAL_COLUMN_RE.is_match(label)
}

/// Whether an account row label names a subtotal or total row.
#[must_use]
pub fn is_total_row_label(label: &str) -> bool {
    TOTAL_ROW_RE.is_match(label)
}

/// Classifies a text block as a previous or current period label.
///
/// The block must carry a period marker before exactly two dates. The
/// previous marker is checked first.
#[must_use]
pub fn period_kind(text: &str) -> Option<PeriodKind> {
    if !PERIOD_RE.is_match(text) || DATE_RE.find_iter(text).count() != 2 {
        return None;
    }

    if text.contains(PREVIOUS_MARKER) {
        Some(PeriodKind::Previous)
    } else if text.contains(CURRENT_MARKER) {
        Some(PeriodKind::Current)
    } else {
        None
    }
}

/// Parses the two dates of a period label.
///
/// Returns `None` unless the text holds exactly two dates and both are
/// valid calendar dates.
#[must_use]
pub fn extract_two_dates(text: &str) -> Option<(NaiveDate, NaiveDate)> {
    let dates: Vec<Option<NaiveDate>> = DATE_RE
        .captures_iter(text)
        .map(|caps| {
            NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )
        })
        .collect();

    match dates.as_slice() {
        [Some(begin), Some(end)] => Some((*begin, *end)),
        _ => None,
    }
}

/// Picks the denomination stated in a unit annotation.
#[must_use]
pub fn unit_scale(annotation: &str) -> UnitScale {
    if annotation.contains(THOUSAND_YEN) {
        UnitScale::Thousand
    } else if annotation.contains(BILLION_YEN) {
        UnitScale::Billion
    } else {
        UnitScale::Million
    }
}

/// Parses a printed amount.
///
/// Hyphens and thousands separators are dropped and `△` becomes a minus
/// sign, so `△1,234` reads as `-1234`. A lone `-` (no amount) reads as
/// `None`.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != ',')
        .map(|c| if c == NEGATIVE_GLYPH { '-' } else { c })
        .collect();

    cleaned.parse().ok()
}
