use crate::render::RenderValue;
use crate::value::{GridValue, ValueKind};
use std::rc::Rc;

/// One fine-grained update: a new value for one global column index.
#[derive(Debug, Clone)]
pub struct ValueChange {
    pub index: usize,
    pub value: GridValue,
}

impl ValueChange {
    pub fn new(index: usize, value: GridValue) -> Self {
        ValueChange { index, value }
    }
}

/// A flat row of grid values indexed by global column index.
///
/// The row is a dumb container: sources decide what changes, the row just
/// holds the current values and their cached projections. Indices outside
/// the row are configuration errors and panic.
#[derive(Debug, Clone, Default)]
pub struct GridRow {
    values: Vec<GridValue>,
}

impl GridRow {
    pub fn new(values: Vec<GridValue>) -> Self {
        GridRow { values }
    }

    /// A placeholder row with one undefined value per column.
    pub fn undefined(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        GridRow {
            values: kinds.into_iter().map(ValueKind::undefined_value).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, index: usize) -> &GridValue {
        self.check_index(index);
        &self.values[index]
    }

    pub fn value_mut(&mut self, index: usize) -> &mut GridValue {
        self.check_index(index);
        &mut self.values[index]
    }

    /// The cached projection for one column, building it if needed.
    pub fn render(&mut self, index: usize) -> Rc<RenderValue> {
        self.value_mut(index).render()
    }

    /// Replaces one value.
    pub fn apply_change(&mut self, index: usize, value: GridValue) {
        self.check_index(index);
        self.values[index] = value;
    }

    /// Applies a batch of fine-grained changes in event order.
    pub fn apply_changes(&mut self, changes: &[ValueChange]) {
        for change in changes {
            self.apply_change(change.index, change.value.clone());
        }
    }

    /// Replaces the contiguous span starting at `first_index` with
    /// `values`, the shape of a source's all-changed event.
    pub fn apply_all(&mut self, first_index: usize, values: &[GridValue]) {
        assert!(
            first_index + values.len() <= self.values.len(),
            "span {}..{} does not fit a row of {} columns",
            first_index,
            first_index + values.len(),
            self.values.len()
        );
        for (offset, value) in values.iter().enumerate() {
            self.values[first_index + offset] = value.clone();
        }
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.values.len(),
            "column index {index} out of range for a row of {} columns",
            self.values.len()
        );
    }
}
