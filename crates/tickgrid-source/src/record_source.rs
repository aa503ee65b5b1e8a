//! The record-backed value source.
//!
//! [`RecordSource`] is the one engine behind every domain adapter: it owns
//! the graded value block for a record, translates the record's typed
//! change events into globally indexed deltas, and regrades the whole block
//! when the record's quality level moves. Domain modules only supply a
//! [`RecordBinding`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tickgrid_model::{Correctness, GridValue, Multicast, Subscription, ValueChange};
use tickgrid_schema::FieldSchema;

use crate::source::{SourceState, ValueSource};

/// The record side of a binding: typed change events plus current quality.
pub trait DataRecord {
    /// The domain's closed field-id enum.
    type Field: Copy + 'static;

    /// Publishes the ids of fields whose values changed, one event per
    /// update batch.
    fn changed(&self) -> &Multicast<Vec<Self::Field>>;

    /// Publishes when the record's quality level actually changed, not on
    /// every badness reassignment.
    fn correctness_changed(&self) -> &Multicast<()>;

    /// Current quality level, derived from the record's badness inputs.
    fn correctness(&self) -> Correctness;

    /// The stable numeric code of a field id.
    fn field_code(field: Self::Field) -> u16;
}

/// Per-domain half of a record source: the schema plus value construction.
pub trait RecordBinding: 'static {
    type Record: DataRecord;

    fn record(&self) -> &Rc<Self::Record>;

    fn schema(&self) -> &Rc<FieldSchema>;

    /// Builds the current, ungraded value for a supported field code.
    ///
    /// # Panics
    ///
    /// May panic for a code the schema does not declare; the engine only
    /// asks for codes taken from the binding's own schema.
    fn build_value(&self, code: u16) -> GridValue;
}

pub type RecordField<B> = <<B as RecordBinding>::Record as DataRecord>::Field;

struct SourceCore<B: RecordBinding> {
    binding: B,
    first_index: usize,
    state: Cell<SourceState>,
    values: RefCell<Vec<GridValue>>,
    guards: RefCell<Vec<Subscription>>,
    seen_usable: Cell<bool>,
    value_changes: Multicast<Vec<ValueChange>>,
    all_changed: Multicast<Vec<GridValue>>,
    first_usable: Multicast<()>,
}

impl<B: RecordBinding> SourceCore<B> {
    fn build_graded(&self, code: u16, level: Correctness) -> GridValue {
        let mut value = self.binding.build_value(code);
        value.set_correctness(level);
        value
    }

    fn rebuild_all(&self, level: Correctness) -> Vec<GridValue> {
        let schema = self.binding.schema();
        (0..schema.field_count())
            .map(|local| self.build_graded(schema.field(local).id(), level))
            .collect()
    }

    fn publish_first_usable(&self, level: Correctness) {
        if level.is_usable() && !self.seen_usable.get() {
            self.seen_usable.set(true);
            self.first_usable.publish(&());
        }
    }

    /// Record delta: rebuild only the named fields, skipping ids the
    /// schema does not support, and publish one offset delta batch.
    fn on_fields_changed(&self, fields: &[RecordField<B>]) {
        if self.state.get() != SourceState::Active {
            return;
        }
        let schema = self.binding.schema();
        let level = self.binding.record().correctness();
        let mut changes = Vec::new();
        {
            let mut values = self.values.borrow_mut();
            for &field in fields {
                let code = <B::Record as DataRecord>::field_code(field);
                let Some(local) = schema.local_index_of(code) else {
                    continue;
                };
                let mut value = self.build_graded(code, level);
                if let Some(attr) = value.direction_since(&values[local]) {
                    value.add_attr(attr);
                }
                values[local] = value.clone();
                changes.push(ValueChange::new(self.first_index + local, value));
            }
        }
        if !changes.is_empty() {
            self.value_changes.publish(&changes);
        }
    }

    /// Quality-level move: every owned value is rebuilt and regraded, and
    /// the whole block goes out in one event.
    fn on_correctness_changed(&self) {
        if self.state.get() != SourceState::Active {
            return;
        }
        let level = self.binding.record().correctness();
        let rebuilt = self.rebuild_all(level);
        *self.values.borrow_mut() = rebuilt.clone();
        self.all_changed.publish(&rebuilt);
        self.publish_first_usable(level);
    }
}

/// A value source backed by one live data record through a
/// [`RecordBinding`].
pub struct RecordSource<B: RecordBinding> {
    core: Rc<SourceCore<B>>,
}

impl<B: RecordBinding> RecordSource<B> {
    pub fn new(binding: B, first_index: usize) -> Self {
        RecordSource {
            core: Rc::new(SourceCore {
                binding,
                first_index,
                state: Cell::new(SourceState::Idle),
                values: RefCell::new(Vec::new()),
                guards: RefCell::new(Vec::new()),
                seen_usable: Cell::new(false),
                value_changes: Multicast::new(),
                all_changed: Multicast::new(),
                first_usable: Multicast::new(),
            }),
        }
    }

    pub fn state(&self) -> SourceState {
        self.core.state.get()
    }

    /// A copy of the currently retained block.
    pub fn current_values(&self) -> Vec<GridValue> {
        self.core.values.borrow().clone()
    }

    pub fn activate(&self) -> Vec<GridValue> {
        let core = &self.core;
        if core.state.get() != SourceState::Idle {
            tracing::warn!(
                schema = %core.binding.schema().name(),
                state = ?core.state.get(),
                "activate ignored; source is not idle"
            );
            return core.values.borrow().clone();
        }

        let level = core.binding.record().correctness();
        let built = core.rebuild_all(level);
        *core.values.borrow_mut() = built.clone();

        // Handlers hold only a weak reference; dropping the source is
        // enough to silence a record that keeps publishing.
        let weak: Weak<SourceCore<B>> = Rc::downgrade(core);
        let changed_guard = core
            .binding
            .record()
            .changed()
            .subscribe_scoped(move |fields: &Vec<RecordField<B>>| {
                if let Some(core) = weak.upgrade() {
                    core.on_fields_changed(fields);
                }
            });
        let weak = Rc::downgrade(core);
        let correctness_guard =
            core.binding
                .record()
                .correctness_changed()
                .subscribe_scoped(move |(): &()| {
                    if let Some(core) = weak.upgrade() {
                        core.on_correctness_changed();
                    }
                });
        core.guards
            .borrow_mut()
            .extend([changed_guard, correctness_guard]);
        core.state.set(SourceState::Active);
        tracing::debug!(
            schema = %core.binding.schema().name(),
            first_index = core.first_index,
            fields = built.len(),
            "source activated"
        );
        core.publish_first_usable(level);
        built
    }

    pub fn deactivate(&self) {
        let core = &self.core;
        if core.state.get() != SourceState::Active {
            tracing::debug!(state = ?core.state.get(), "deactivate ignored; source is not active");
            return;
        }
        core.guards.borrow_mut().clear();
        core.state.set(SourceState::Stopped);
        tracing::debug!(schema = %core.binding.schema().name(), "source deactivated");
    }

    pub fn first_index(&self) -> usize {
        self.core.first_index
    }

    pub fn field_count(&self) -> usize {
        self.core.binding.schema().field_count()
    }

    pub fn subscribe_value_changes(&self, handler: impl Fn(&[ValueChange]) + 'static) -> Subscription {
        self.core
            .value_changes
            .subscribe_scoped(move |changes: &Vec<ValueChange>| handler(changes))
    }

    pub fn subscribe_all_changed(&self, handler: impl Fn(&[GridValue]) + 'static) -> Subscription {
        self.core
            .all_changed
            .subscribe_scoped(move |values: &Vec<GridValue>| handler(values))
    }

    pub fn subscribe_first_usable(&self, handler: impl Fn() + 'static) -> Subscription {
        self.core.first_usable.subscribe_scoped(move |(): &()| handler())
    }
}

impl<B: RecordBinding> Clone for RecordSource<B> {
    fn clone(&self) -> Self {
        RecordSource {
            core: Rc::clone(&self.core),
        }
    }
}

impl<B: RecordBinding> ValueSource for RecordSource<B> {
    fn activate(&self) -> Vec<GridValue> {
        RecordSource::activate(self)
    }

    fn deactivate(&self) {
        RecordSource::deactivate(self);
    }

    fn first_index(&self) -> usize {
        RecordSource::first_index(self)
    }

    fn field_count(&self) -> usize {
        RecordSource::field_count(self)
    }

    fn subscribe_value_changes(&self, handler: Box<dyn Fn(&[ValueChange])>) -> Subscription {
        RecordSource::subscribe_value_changes(self, handler)
    }

    fn subscribe_all_changed(&self, handler: Box<dyn Fn(&[GridValue])>) -> Subscription {
        RecordSource::subscribe_all_changed(self, handler)
    }

    fn subscribe_first_usable(&self, handler: Box<dyn Fn()>) -> Subscription {
        RecordSource::subscribe_first_usable(self, handler)
    }
}
