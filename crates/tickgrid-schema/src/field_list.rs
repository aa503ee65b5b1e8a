#![deny(unsafe_code)]

//! Composition of several field schemas into one global column space.
//!
//! Schemas are appended in display order; each is assigned the next
//! contiguous block of global indices. Offsets are stable for the life of
//! the list, so value sources can be handed their base index once at
//! binding time.

use std::rc::Rc;

use tickgrid_model::{ColumnState, GridField, GridRow, GridValue};

use crate::schema::FieldSchema;

struct SchemaEntry {
    schema: Rc<FieldSchema>,
    heading_prefix: String,
    first_index: usize,
}

impl SchemaEntry {
    fn end_index(&self) -> usize {
        self.first_index + self.schema.field_count()
    }
}

/// An ordered list of schemas sharing one global column index space.
#[derive(Default)]
pub struct FieldList {
    entries: Vec<SchemaEntry>,
    total: usize,
}

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a schema block and returns its assigned first global index.
    /// The block occupies `[first, first + schema.field_count())`.
    pub fn add_schema(&mut self, schema: Rc<FieldSchema>, heading_prefix: impl Into<String>) -> usize {
        let first_index = self.total;
        self.total += schema.field_count();
        tracing::debug!(
            schema = %schema.name(),
            first_index,
            fields = schema.field_count(),
            "schema added to field list"
        );
        self.entries.push(SchemaEntry {
            schema,
            heading_prefix: heading_prefix.into(),
            first_index,
        });
        first_index
    }

    /// Total number of columns across all schemas.
    pub fn field_count(&self) -> usize {
        self.total
    }

    pub fn schema_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The schema at `position`, in addition order.
    pub fn schema(&self, position: usize) -> &Rc<FieldSchema> {
        &self.entries[position].schema
    }

    /// Resolves a global index to `(schema position, schema-local index)`.
    ///
    /// # Panics
    ///
    /// Panics when no schema owns the index; every valid index lies in
    /// `[0, field_count())`.
    pub fn locate(&self, global_index: usize) -> (usize, usize) {
        let entry = self
            .entries
            .iter()
            .position(|entry| global_index >= entry.first_index && global_index < entry.end_index());
        match entry {
            Some(position) => (
                position,
                global_index - self.entries[position].first_index,
            ),
            None => panic!(
                "global field index {global_index} out of range for a field list of {} columns",
                self.total
            ),
        }
    }

    /// The qualified name of the field at a global index.
    pub fn field_name(&self, global_index: usize) -> &str {
        let (position, local) = self.locate(global_index);
        self.entries[position].schema.field(local).qualified_name()
    }

    /// The resolved heading of the field at a global index, with the
    /// owning block's prefix applied.
    pub fn field_heading(&self, global_index: usize) -> String {
        let (position, local) = self.locate(global_index);
        let entry = &self.entries[position];
        format!("{}{}", entry.heading_prefix, entry.schema.field(local).heading())
    }

    /// First match for a qualified name, searching blocks in addition
    /// order. Duplicate schemas occur (call and put legs share one schema),
    /// so the earliest block wins.
    pub fn find_field_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().find_map(|entry| {
            entry
                .schema
                .find_field_by_name(name)
                .map(|local| entry.first_index + local)
        })
    }

    /// All grid columns, in global index order.
    pub fn grid_fields(&self) -> Vec<GridField> {
        self.entries
            .iter()
            .flat_map(|entry| entry.schema.grid_fields(entry.first_index, &entry.heading_prefix))
            .collect()
    }

    /// Initial column metadata, in global index order.
    pub fn initial_states(&self) -> Vec<ColumnState> {
        self.entries
            .iter()
            .flat_map(|entry| entry.schema.initial_states(&entry.heading_prefix))
            .collect()
    }

    /// A placeholder row with one undefined value per column, used when a
    /// row has no backing record at all.
    pub fn undefined_row(&self) -> GridRow {
        let values: Vec<GridValue> = self
            .entries
            .iter()
            .flat_map(|entry| entry.schema.undefined_values())
            .collect();
        GridRow::new(values)
    }

    /// Drops every schema and resets the index space to empty.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headings::HeadingOverrides;
    use crate::schema::FieldSpec;
    use tickgrid_model::ValueKind;

    fn schema(name: &'static str, field_names: &[&'static str]) -> Rc<FieldSchema> {
        let specs = field_names.iter().enumerate().map(|(id, field_name)| FieldSpec {
            id: u16::try_from(id).unwrap(),
            name: field_name,
            heading: field_name,
            kind: ValueKind::Text,
            supported: true,
        });
        Rc::new(FieldSchema::build(name, specs, &HeadingOverrides::new()))
    }

    fn three_and_five() -> FieldList {
        let mut list = FieldList::new();
        list.add_schema(schema("Account", &["Id", "Name", "Currency"]), "");
        list.add_schema(schema("Order", &["Id", "Symbol", "Side", "Price", "Quantity"]), "");
        list
    }

    #[test]
    fn test_blocks_are_contiguous_and_offsets_returned() {
        let mut list = FieldList::new();
        let first = list.add_schema(schema("Account", &["Id", "Name", "Currency"]), "");
        let second = list.add_schema(schema("Order", &["Id", "Symbol"]), "");
        assert_eq!(first, 0);
        assert_eq!(second, 3);
        assert_eq!(list.field_count(), 5);
        assert_eq!(list.schema_count(), 2);
    }

    #[test]
    fn test_global_index_resolves_to_owning_schema() {
        let list = three_and_five();
        assert_eq!(list.locate(0), (0, 0));
        assert_eq!(list.locate(2), (0, 2));
        assert_eq!(list.locate(3), (1, 0));
        assert_eq!(list.locate(5), (1, 2), "index 5 is the second schema's third field");
        assert_eq!(list.locate(7), (1, 4));
        assert_eq!(list.field_name(5), "Order,Side");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_the_last_block_panics() {
        three_and_five().locate(8);
    }

    #[test]
    fn test_first_match_wins_for_duplicate_schemas() {
        let mut list = FieldList::new();
        let leg = schema("Quote", &["Symbol", "Last"]);
        list.add_schema(Rc::clone(&leg), "Call ");
        list.add_schema(leg, "Put ");
        assert_eq!(list.find_field_by_name("Quote,Last"), Some(1));
        assert_eq!(list.field_heading(1), "Call Last");
        assert_eq!(list.field_heading(3), "Put Last");
    }

    #[test]
    fn test_grid_fields_cover_every_column_in_order() {
        let list = three_and_five();
        let fields = list.grid_fields();
        assert_eq!(fields.len(), 8);
        for (expected_index, field) in fields.iter().enumerate() {
            assert_eq!(field.index(), expected_index);
        }
    }

    #[test]
    fn test_undefined_row_spans_all_columns() {
        let list = three_and_five();
        let row = list.undefined_row();
        assert_eq!(row.len(), 8);
        assert!(row.value(7).is_undefined());
    }

    #[test]
    fn test_clear_resets_the_index_space() {
        let mut list = three_and_five();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.field_count(), 0);
        assert_eq!(list.add_schema(schema("Feed", &["Name"]), ""), 0);
    }
}
