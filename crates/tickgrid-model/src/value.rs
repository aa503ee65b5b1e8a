//! The type-erased grid value.
//!
//! A grid column only ever holds one concrete datum type, but the row model
//! and the grid widget work in terms of [`GridValue`], a closed enum with
//! one variant per supported type. Mixing kinds within one column is a
//! configuration error and panics.

use crate::cell::CellValue;
use crate::correctness::Correctness;
use crate::datum::SymbolId;
use crate::render::{RenderAttr, RenderValue, TextAlign};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Names the concrete datum type of a column or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Text,
    Integer,
    Decimal,
    Date,
    DateTime,
    Boolean,
    Symbol,
    TextArray,
    IntegerArray,
}

impl ValueKind {
    /// Default column alignment for this kind: numbers and dates right,
    /// booleans centered, everything else left.
    pub fn default_align(self) -> TextAlign {
        match self {
            ValueKind::Integer | ValueKind::Decimal | ValueKind::Date | ValueKind::DateTime => {
                TextAlign::Right
            }
            ValueKind::Boolean => TextAlign::Center,
            ValueKind::Text | ValueKind::Symbol | ValueKind::TextArray | ValueKind::IntegerArray => {
                TextAlign::Left
            }
        }
    }

    /// Whether values of this kind carry increase/decrease attributes when
    /// they move between updates.
    pub fn is_directional(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Decimal)
    }

    /// An undefined value of this kind, used as the placeholder for columns
    /// with no backing record.
    pub fn undefined_value(self) -> GridValue {
        match self {
            ValueKind::Text => GridValue::Text(CellValue::undefined()),
            ValueKind::Integer => GridValue::Integer(CellValue::undefined()),
            ValueKind::Decimal => GridValue::Decimal(CellValue::undefined()),
            ValueKind::Date => GridValue::Date(CellValue::undefined()),
            ValueKind::DateTime => GridValue::DateTime(CellValue::undefined()),
            ValueKind::Boolean => GridValue::Boolean(CellValue::undefined()),
            ValueKind::Symbol => GridValue::Symbol(CellValue::undefined()),
            ValueKind::TextArray => GridValue::TextArray(CellValue::undefined()),
            ValueKind::IntegerArray => GridValue::IntegerArray(CellValue::undefined()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "Text",
            ValueKind::Integer => "Integer",
            ValueKind::Decimal => "Decimal",
            ValueKind::Date => "Date",
            ValueKind::DateTime => "DateTime",
            ValueKind::Boolean => "Boolean",
            ValueKind::Symbol => "Symbol",
            ValueKind::TextArray => "TextArray",
            ValueKind::IntegerArray => "IntegerArray",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One grid cell, type-erased over the supported datum types.
#[derive(Debug, Clone)]
pub enum GridValue {
    Text(CellValue<String>),
    Integer(CellValue<i64>),
    Decimal(CellValue<Decimal>),
    Date(CellValue<NaiveDate>),
    DateTime(CellValue<DateTime<Utc>>),
    Boolean(CellValue<bool>),
    Symbol(CellValue<SymbolId>),
    TextArray(CellValue<Vec<String>>),
    IntegerArray(CellValue<Vec<i64>>),
}

/// Applies one expression to the cell inside whichever variant is present.
macro_rules! with_cell {
    ($value:expr, $cell:ident => $body:expr) => {
        match $value {
            GridValue::Text($cell) => $body,
            GridValue::Integer($cell) => $body,
            GridValue::Decimal($cell) => $body,
            GridValue::Date($cell) => $body,
            GridValue::DateTime($cell) => $body,
            GridValue::Boolean($cell) => $body,
            GridValue::Symbol($cell) => $body,
            GridValue::TextArray($cell) => $body,
            GridValue::IntegerArray($cell) => $body,
        }
    };
}

impl GridValue {
    pub fn text(value: impl Into<String>) -> Self {
        GridValue::Text(CellValue::defined(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        GridValue::Integer(CellValue::defined(value))
    }

    pub fn integer_opt(value: Option<i64>) -> Self {
        GridValue::Integer(CellValue::nullable(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        GridValue::Decimal(CellValue::defined(value))
    }

    pub fn decimal_opt(value: Option<Decimal>) -> Self {
        GridValue::Decimal(CellValue::nullable(value))
    }

    pub fn date(value: NaiveDate) -> Self {
        GridValue::Date(CellValue::defined(value))
    }

    pub fn date_opt(value: Option<NaiveDate>) -> Self {
        GridValue::Date(CellValue::nullable(value))
    }

    pub fn date_time(value: DateTime<Utc>) -> Self {
        GridValue::DateTime(CellValue::defined(value))
    }

    pub fn boolean(value: bool) -> Self {
        GridValue::Boolean(CellValue::defined(value))
    }

    pub fn symbol(value: SymbolId) -> Self {
        GridValue::Symbol(CellValue::defined(value))
    }

    pub fn symbol_opt(value: Option<SymbolId>) -> Self {
        GridValue::Symbol(CellValue::nullable(value))
    }

    pub fn text_array(values: Vec<String>) -> Self {
        GridValue::TextArray(CellValue::defined(values))
    }

    pub fn integer_array(values: Vec<i64>) -> Self {
        GridValue::IntegerArray(CellValue::defined(values))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            GridValue::Text(_) => ValueKind::Text,
            GridValue::Integer(_) => ValueKind::Integer,
            GridValue::Decimal(_) => ValueKind::Decimal,
            GridValue::Date(_) => ValueKind::Date,
            GridValue::DateTime(_) => ValueKind::DateTime,
            GridValue::Boolean(_) => ValueKind::Boolean,
            GridValue::Symbol(_) => ValueKind::Symbol,
            GridValue::TextArray(_) => ValueKind::TextArray,
            GridValue::IntegerArray(_) => ValueKind::IntegerArray,
        }
    }

    pub fn is_undefined(&self) -> bool {
        with_cell!(self, cell => cell.is_undefined())
    }

    pub fn is_null(&self) -> bool {
        with_cell!(self, cell => cell.is_null())
    }

    pub fn is_defined(&self) -> bool {
        with_cell!(self, cell => cell.is_defined())
    }

    pub fn correctness(&self) -> Correctness {
        with_cell!(self, cell => cell.correctness())
    }

    pub fn set_correctness(&mut self, level: Correctness) {
        with_cell!(self, cell => cell.set_correctness(level));
    }

    pub fn add_attr(&mut self, attr: RenderAttr) {
        with_cell!(self, cell => cell.add_attr(attr));
    }

    pub fn attrs(&self) -> &[RenderAttr] {
        with_cell!(self, cell => cell.attrs())
    }

    pub fn render(&mut self) -> Rc<RenderValue> {
        with_cell!(self, cell => cell.render())
    }

    pub fn peek_render(&self) -> Option<&Rc<RenderValue>> {
        with_cell!(self, cell => cell.peek_render())
    }

    pub fn clear_render(&mut self) {
        with_cell!(self, cell => cell.clear_render());
    }

    /// Compares two values of the same kind through the presence order and
    /// the datum's own order.
    ///
    /// # Panics
    ///
    /// Panics when the kinds differ. A column holds exactly one kind, so a
    /// mismatch here is a configuration error, not a data condition.
    pub fn compare(&self, other: &GridValue) -> Ordering {
        match (self, other) {
            (GridValue::Text(a), GridValue::Text(b)) => a.compare(b),
            (GridValue::Integer(a), GridValue::Integer(b)) => a.compare(b),
            (GridValue::Decimal(a), GridValue::Decimal(b)) => a.compare(b),
            (GridValue::Date(a), GridValue::Date(b)) => a.compare(b),
            (GridValue::DateTime(a), GridValue::DateTime(b)) => a.compare(b),
            (GridValue::Boolean(a), GridValue::Boolean(b)) => a.compare(b),
            (GridValue::Symbol(a), GridValue::Symbol(b)) => a.compare(b),
            (GridValue::TextArray(a), GridValue::TextArray(b)) => a.compare(b),
            (GridValue::IntegerArray(a), GridValue::IntegerArray(b)) => a.compare(b),
            (a, b) => panic!(
                "cannot compare a {} value with a {} value in one column",
                a.kind(),
                b.kind()
            ),
        }
    }

    /// The direction attribute for a value that replaced `previous` in the
    /// same column, if any. Only directional kinds move, and only when both
    /// sides are defined.
    pub fn direction_since(&self, previous: &GridValue) -> Option<RenderAttr> {
        if !self.kind().is_directional() || !self.is_defined() || !previous.is_defined() {
            return None;
        }
        match self.compare(previous) {
            Ordering::Greater => Some(RenderAttr::ValueIncreased),
            Ordering::Less => Some(RenderAttr::ValueDecreased),
            Ordering::Equal => None,
        }
    }
}
