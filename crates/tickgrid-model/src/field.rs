use crate::render::{ColumnState, RenderValue};
use crate::row::GridRow;
use crate::value::{GridValue, ValueKind};
use std::cmp::Ordering;
use std::rc::Rc;

/// One grid column: its stable qualified name, heading, global index and
/// datum kind.
///
/// Fields are immutable and hold no per-row state; all comparison and
/// rendering state lives in the row's values. The grid sorts through
/// [`GridField::compare`] without knowing concrete datum types.
#[derive(Debug, Clone)]
pub struct GridField {
    name: String,
    heading: String,
    index: usize,
    kind: ValueKind,
}

impl GridField {
    pub fn new(name: impl Into<String>, heading: impl Into<String>, index: usize, kind: ValueKind) -> Self {
        GridField {
            name: name.into(),
            heading: heading.into(),
            index,
            kind,
        }
    }

    /// The stable qualified name, the key user layouts persist.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Initial heading and alignment for the grid widget.
    pub fn initial_state(&self) -> ColumnState {
        ColumnState::new(self.heading.clone(), self.kind.default_align())
    }

    /// This column's value in `row`.
    pub fn value<'r>(&self, row: &'r GridRow) -> &'r GridValue {
        row.value(self.index)
    }

    /// This column's cached projection in `row`.
    pub fn render(&self, row: &mut GridRow) -> Rc<RenderValue> {
        row.render(self.index)
    }

    /// Ascending order between two rows on this column: presence rank
    /// first (`Undefined < Null < Defined`), then the kind's own order.
    pub fn compare(&self, a: &GridRow, b: &GridRow) -> Ordering {
        a.value(self.index).compare(b.value(self.index))
    }

    /// Descending order: the exact reversal of [`GridField::compare`],
    /// including the undefined/null block, which therefore sorts last.
    pub fn compare_desc(&self, a: &GridRow, b: &GridRow) -> Ordering {
        self.compare(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_rows() -> (GridField, Vec<GridRow>) {
        let field = GridField::new("Holding,Price", "Price", 0, ValueKind::Integer);
        let rows = vec![
            GridRow::new(vec![GridValue::integer(30)]),
            GridRow::new(vec![GridValue::integer(10)]),
            GridRow::new(vec![GridValue::integer_opt(None)]),
            GridRow::undefined([ValueKind::Integer]),
        ];
        (field, rows)
    }

    #[test]
    fn test_ascending_puts_undefined_then_null_first() {
        let (field, mut rows) = price_rows();
        rows.sort_by(|a, b| field.compare(a, b));
        assert!(rows[0].value(0).is_undefined());
        assert!(rows[1].value(0).is_null());
        assert_eq!(rows[2].value(0).compare(&GridValue::integer(10)), Ordering::Equal);
        assert_eq!(rows[3].value(0).compare(&GridValue::integer(30)), Ordering::Equal);
    }

    #[test]
    fn test_descending_is_the_full_reversal() {
        let (field, rows) = price_rows();
        for a in &rows {
            for b in &rows {
                assert_eq!(field.compare_desc(a, b), field.compare(b, a));
            }
        }
        let mut sorted = rows;
        sorted.sort_by(|a, b| field.compare_desc(a, b));
        assert!(sorted.last().is_some_and(|row| row.value(0).is_undefined()));
    }

    #[test]
    fn test_initial_state_uses_kind_alignment() {
        let (field, _) = price_rows();
        let state = field.initial_state();
        assert_eq!(state.heading, "Price");
        assert_eq!(state.align, crate::render::TextAlign::Right);
    }
}
