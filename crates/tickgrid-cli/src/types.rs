//! Result types passed from command execution to summary printing.

use tickgrid_model::{Correctness, RenderAttr, SymbolId, TextAlign, ValueKind};

/// One column of the composed index space, as listed by `columns`.
pub struct ColumnRow {
    pub index: usize,
    pub name: String,
    pub heading: String,
    pub kind: ValueKind,
    pub align: TextAlign,
}

/// One rendered cell of the simulated row.
pub struct CellSnapshot {
    pub index: usize,
    pub heading: String,
    pub text: String,
    pub attrs: Vec<RenderAttr>,
    pub correctness: Correctness,
}

/// The row state after one scripted step.
pub struct StepSnapshot {
    pub label: String,
    pub changed: usize,
    pub cells: Vec<CellSnapshot>,
}

/// Full result of a simulated session.
pub struct SessionResult {
    pub symbol: SymbolId,
    pub steps: Vec<StepSnapshot>,
}
