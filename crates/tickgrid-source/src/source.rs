//! The value-source surface.
//!
//! A value source owns one contiguous block of columns in a row: it
//! produces the block's current values on activation and publishes deltas
//! while active. The row binder only sees this trait, never the concrete
//! record types behind it.

use std::rc::Rc;

use tickgrid_model::{GridValue, Multicast, Subscription, ValueChange};
use tickgrid_schema::FieldSchema;

/// Lifecycle of a value source. `Stopped` is terminal; a new binding
/// session gets a fresh source instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Idle,
    Active,
    Stopped,
}

/// One block of live columns, bound into a row at a fixed base index.
///
/// Sources publish three kinds of events on independent channels:
/// fine-grained [`ValueChange`] batches with globally offset indices, the
/// full refreshed block when everything changed at once, and a latch that
/// fires the first time the backing data reaches a usable quality level.
pub trait ValueSource {
    /// Starts the source and returns the block's initial values, one per
    /// owned column. Activating a source that is not idle is a tolerated
    /// misuse: it logs a warning and returns the current values.
    fn activate(&self) -> Vec<GridValue>;

    /// Stops the source and detaches from the backing record. Idempotent;
    /// calling it on a source that is not active is a no-op.
    fn deactivate(&self);

    /// First global column index of the owned block.
    fn first_index(&self) -> usize;

    /// Number of owned columns.
    fn field_count(&self) -> usize;

    fn subscribe_value_changes(&self, handler: Box<dyn Fn(&[ValueChange])>) -> Subscription;

    fn subscribe_all_changed(&self, handler: Box<dyn Fn(&[GridValue])>) -> Subscription;

    fn subscribe_first_usable(&self, handler: Box<dyn Fn()>) -> Subscription;
}

/// Placeholder source for a block with no backing record, such as the
/// missing leg of an option pair. Produces undefined values and never
/// publishes.
pub struct UndefinedSource {
    schema: Rc<FieldSchema>,
    first_index: usize,
    value_changes: Multicast<Vec<ValueChange>>,
    all_changed: Multicast<Vec<GridValue>>,
    first_usable: Multicast<()>,
}

impl UndefinedSource {
    pub fn new(schema: Rc<FieldSchema>, first_index: usize) -> Self {
        UndefinedSource {
            schema,
            first_index,
            value_changes: Multicast::new(),
            all_changed: Multicast::new(),
            first_usable: Multicast::new(),
        }
    }
}

impl ValueSource for UndefinedSource {
    fn activate(&self) -> Vec<GridValue> {
        self.schema.undefined_values()
    }

    fn deactivate(&self) {}

    fn first_index(&self) -> usize {
        self.first_index
    }

    fn field_count(&self) -> usize {
        self.schema.field_count()
    }

    fn subscribe_value_changes(&self, handler: Box<dyn Fn(&[ValueChange])>) -> Subscription {
        self.value_changes
            .subscribe_scoped(move |changes: &Vec<ValueChange>| handler(changes))
    }

    fn subscribe_all_changed(&self, handler: Box<dyn Fn(&[GridValue])>) -> Subscription {
        self.all_changed
            .subscribe_scoped(move |values: &Vec<GridValue>| handler(values))
    }

    fn subscribe_first_usable(&self, handler: Box<dyn Fn()>) -> Subscription {
        self.first_usable.subscribe_scoped(move |(): &()| handler())
    }
}
