//! Raw datum types carried by grid cells.
//!
//! [`Datum`] gives every concrete type two things the grid needs: the
//! canonical projection text and a type-specific total order. Comparison
//! never goes through the rendered text except where a type's order is
//! defined that way (`bool`).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Date columns render in ISO calendar form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Timestamp columns render as a local-naive reading of the UTC instant.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw value a cell can hold.
pub trait Datum: Clone {
    /// Canonical display text for this value.
    fn render_text(&self) -> String;

    /// Type-specific total order between two defined values.
    fn cmp_datum(&self, other: &Self) -> Ordering;
}

impl Datum for String {
    fn render_text(&self) -> String {
        self.clone()
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Datum for i64 {
    fn render_text(&self) -> String {
        self.to_string()
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Datum for Decimal {
    fn render_text(&self) -> String {
        self.to_string()
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Datum for NaiveDate {
    fn render_text(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Datum for DateTime<Utc> {
    fn render_text(&self) -> String {
        self.format(DATE_TIME_FORMAT).to_string()
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Booleans order by their rendered text, the same fallback an enumerated
/// text column uses. "No" sorts before "Yes", which happens to match the
/// numeric reading as well.
impl Datum for bool {
    fn render_text(&self) -> String {
        if *self { "Yes".to_owned() } else { "No".to_owned() }
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.render_text().cmp(&other.render_text())
    }
}

impl Datum for Vec<String> {
    fn render_text(&self) -> String {
        self.join(", ")
    }

    /// Element-wise, then by length. A prefix sorts before its extension.
    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl Datum for Vec<i64> {
    fn render_text(&self) -> String {
        let parts: Vec<String> = self.iter().map(ToString::to_string).collect();
        parts.join(", ")
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

/// Exchange-qualified security identifier.
///
/// Orders by code first, then market, so "BHP.ASX" and "BHP.NZX" group
/// together in a sorted column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId {
    code: String,
    market: String,
}

impl SymbolId {
    pub fn new(code: impl Into<String>, market: impl Into<String>) -> Self {
        SymbolId {
            code: code.into(),
            market: market.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn market(&self) -> &str {
        &self.market
    }
}

impl Datum for SymbolId {
    fn render_text(&self) -> String {
        format!("{}.{}", self.code, self.market)
    }

    fn cmp_datum(&self, other: &Self) -> Ordering {
        self.code
            .cmp(&other.code)
            .then_with(|| self.market.cmp(&other.market))
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.code, self.market)
    }
}

/// Error parsing a `CODE.MARKET` symbol string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSymbolError {
    #[error("symbol '{0}' is missing the '.' market separator")]
    MissingSeparator(String),
    #[error("symbol '{0}' has an empty code or market part")]
    EmptyPart(String),
}

impl FromStr for SymbolId {
    type Err = ParseSymbolError;

    /// Parses `CODE.MARKET`, splitting at the last dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((code, market)) = s.rsplit_once('.') else {
            return Err(ParseSymbolError::MissingSeparator(s.to_owned()));
        };
        if code.is_empty() || market.is_empty() {
            return Err(ParseSymbolError::EmptyPart(s.to_owned()));
        }
        Ok(SymbolId::new(code, market))
    }
}
