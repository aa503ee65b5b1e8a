use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual attribute attached to a rendered cell.
///
/// `DataSuspect` and `DataError` mirror the cell's correctness level and are
/// maintained automatically by the cell; the directional pair marks a
/// defined numeric value that moved since the previous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderAttr {
    DataSuspect,
    DataError,
    ValueIncreased,
    ValueDecreased,
}

impl RenderAttr {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderAttr::DataSuspect => "suspect",
            RenderAttr::DataError => "error",
            RenderAttr::ValueIncreased => "up",
            RenderAttr::ValueDecreased => "down",
        }
    }
}

impl fmt::Display for RenderAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display-ready projection of one cell: final text plus the visual
/// attributes in force when it was built. Immutable once built; cells cache
/// and share these via `Rc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderValue {
    pub text: String,
    pub attrs: Vec<RenderAttr>,
}

impl RenderValue {
    pub fn new(text: String, attrs: Vec<RenderAttr>) -> Self {
        RenderValue { text, attrs }
    }

    pub fn has_attr(&self, attr: RenderAttr) -> bool {
        self.attrs.contains(&attr)
    }
}

/// Horizontal alignment for a column, derived from the column's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Initial per-column metadata handed to the grid widget when a source set
/// is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub heading: String,
    pub align: TextAlign,
}

impl ColumnState {
    pub fn new(heading: impl Into<String>, align: TextAlign) -> Self {
        ColumnState {
            heading: heading.into(),
            align,
        }
    }
}
