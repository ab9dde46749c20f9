#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types produced by the segment report reader.
//!
//! A segment report table yields one [`Period`], an ordered list of
//! [`Segment`] columns, and up to two [`Account`] rows (sales and profit).
//! Each segment/account intersection is read into a [`SegmentValue`].
//!
//! All records are plain immutable values. Nothing here knows about HTML.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Which reporting period a segment table describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PeriodKind {
    /// The comparative period of the prior fiscal year (前期).
    Previous,
    /// The period being reported (当期).
    Current,
}

/// The reporting period of one segment table.
///
/// `kind` is only set when the label matched the previous/current period
/// pattern. `begin` and `end` are either both set or both unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Previous or current period. `None` means the label was not found.
    pub kind: Option<PeriodKind>,
    /// Raw label text the period was read from.
    pub description: String,
    /// First day of the period.
    pub begin: Option<NaiveDate>,
    /// Last day of the period.
    pub end: Option<NaiveDate>,
}

impl Period {
    /// Returns `true` when the period label was recognized.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.kind.is_some()
    }
}

/// A reportable business segment, represented as a table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based rank among the recognized segment columns.
    pub order: usize,
    /// 0-based cell index within a body row of the table.
    pub position: usize,
    /// Column label with all whitespace removed.
    pub name: String,
}

/// Whether an account row carries sales or profit figures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AccountKind {
    /// Sales or operating revenue row.
    Sales,
    /// Segment profit (or loss) row.
    Profit,
}

impl AccountKind {
    /// Position of this kind in the returned account list.
    #[must_use]
    pub const fn order(self) -> usize {
        match self {
            Self::Sales => 0,
            Self::Profit => 1,
        }
    }
}

/// Currency denomination stated in a table's unit annotation.
///
/// Serialized as its multiplier (`1000`, `1000000`, `1000000000`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum UnitScale {
    /// Thousands of yen (千円).
    Thousand,
    /// Millions of yen (百万円). Assumed when no annotation is found.
    #[default]
    Million,
    /// Billions of yen (十億円).
    Billion,
}

impl UnitScale {
    /// Returns the factor a printed value must be multiplied by.
    #[must_use]
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::Thousand => 1_000,
            Self::Million => 1_000_000,
            Self::Billion => 1_000_000_000,
        }
    }

    /// Creates a scale from its multiplier.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not one of the three known multipliers.
    pub const fn from_multiplier(value: u64) -> Result<Self, InvalidUnitError> {
        match value {
            1_000 => Ok(Self::Thousand),
            1_000_000 => Ok(Self::Million),
            1_000_000_000 => Ok(Self::Billion),
            _ => Err(InvalidUnitError { value }),
        }
    }
}

impl From<UnitScale> for u64 {
    fn from(scale: UnitScale) -> Self {
        scale.multiplier()
    }
}

impl TryFrom<u64> for UnitScale {
    type Error = InvalidUnitError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_multiplier(value)
    }
}

/// Error returned when a multiplier does not match any [`UnitScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid unit multiplier {value}: expected 1000, 1000000 or 1000000000")]
pub struct InvalidUnitError {
    /// The multiplier that was provided.
    pub value: u64,
}

/// A financial line item, represented as a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// 0 for sales, 1 for profit.
    pub order: usize,
    /// 0-based row index within the table.
    pub position: usize,
    /// Sales or profit.
    pub kind: AccountKind,
    /// Row label with all whitespace removed.
    pub name: String,
    /// Denomination of the values in this row.
    pub unit: UnitScale,
}

impl Account {
    /// Creates an account whose `order` follows from its `kind`.
    #[must_use]
    pub fn new(kind: AccountKind, position: usize, name: impl Into<String>, unit: UnitScale) -> Self {
        Self {
            order: kind.order(),
            position,
            kind,
            name: name.into(),
            unit,
        }
    }
}

/// The value read at one segment/account intersection.
///
/// Flattened so that it serializes as a single row: segment fields,
/// account fields, then the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentValue {
    pub segment_order: usize,
    pub segment_position: usize,
    pub segment_name: String,
    pub account_order: usize,
    pub account_position: usize,
    pub account_kind: AccountKind,
    pub account_name: String,
    pub account_unit: UnitScale,
    /// Number as printed in the cell. `None` when the cell was not numeric.
    pub value: Option<f64>,
}

impl SegmentValue {
    /// Copies the segment and account metadata next to `value`.
    #[must_use]
    pub fn new(segment: &Segment, account: &Account, value: Option<f64>) -> Self {
        Self {
            segment_order: segment.order,
            segment_position: segment.position,
            segment_name: segment.name.clone(),
            account_order: account.order,
            account_position: account.position,
            account_kind: account.kind,
            account_name: account.name.clone(),
            account_unit: account.unit,
            value,
        }
    }

    /// Returns `true` when the cell could not be parsed as a number.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        self.value.is_none()
    }

    /// The value multiplied by the account's unit, in yen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scaled_value(&self) -> Option<f64> {
        self.value
            .map(|value| value * self.account_unit.multiplier() as f64)
    }
}
