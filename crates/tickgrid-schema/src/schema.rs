#![deny(unsafe_code)]

//! Per-domain field schemas.
//!
//! Each data domain declares its fields once, in a fixed order, as
//! [`FieldSpec`] entries keyed by the domain's numeric field id. Building a
//! [`FieldSchema`] resolves everything the grid needs up front: qualified
//! names, heading overrides, alignment from the datum kind, and the
//! id-to-index table used to translate record deltas. Schemas are immutable
//! after construction and shared via `Rc` by every source bound to them.

use tickgrid_model::{ColumnState, GridField, GridValue, TextAlign, ValueKind};

use crate::headings::HeadingOverrides;
use crate::naming::qualified_name;

/// Declaration of one domain field, before resolution.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Domain-local numeric field id, as carried in record change events.
    pub id: u16,
    /// Sourceless field name, the persisted half of the qualified name.
    pub name: &'static str,
    /// Built-in column heading, used when no override exists.
    pub heading: &'static str,
    pub kind: ValueKind,
    /// Unsupported fields exist in the domain's id space but get no
    /// column; deltas for them are skipped.
    pub supported: bool,
}

/// One resolved, displayable field of a schema.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    id: u16,
    name: &'static str,
    qualified_name: String,
    heading: String,
    kind: ValueKind,
    align: TextAlign,
}

impl FieldInfo {
    pub fn id(&self) -> u16 {
        self.id
    }

    /// The sourceless field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The stable `schema,field` qualified name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Resolved heading: the user override if one exists, else the
    /// built-in heading.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }
}

/// The resolved column schema of one data domain.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    fields: Vec<FieldInfo>,
    index_by_id: Vec<Option<usize>>,
}

impl FieldSchema {
    /// Resolves a domain's field declarations against the heading
    /// overrides.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate field id; the id space of a domain is closed
    /// and ids come from its field enum, so a duplicate is a declaration
    /// error.
    pub fn build(
        name: impl Into<String>,
        specs: impl IntoIterator<Item = FieldSpec>,
        overrides: &HeadingOverrides,
    ) -> Self {
        let name = name.into();
        let mut fields = Vec::new();
        let mut index_by_id: Vec<Option<usize>> = Vec::new();
        let mut seen = std::collections::BTreeSet::new();

        for spec in specs {
            assert!(
                seen.insert(spec.id),
                "schema '{name}' declares field id {} twice",
                spec.id
            );
            let slot = usize::from(spec.id);
            if slot >= index_by_id.len() {
                index_by_id.resize(slot + 1, None);
            }
            if !spec.supported {
                continue;
            }
            let heading = overrides
                .get(&name, spec.name)
                .unwrap_or(spec.heading)
                .to_owned();
            index_by_id[slot] = Some(fields.len());
            fields.push(FieldInfo {
                id: spec.id,
                name: spec.name,
                qualified_name: qualified_name(&name, spec.name),
                heading,
                kind: spec.kind,
                align: spec.kind.default_align(),
            });
        }

        tracing::debug!(schema = %name, fields = fields.len(), "resolved field schema");
        FieldSchema {
            name,
            fields,
            index_by_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of supported fields, which is the number of columns this
    /// schema contributes.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, local_index: usize) -> &FieldInfo {
        assert!(
            local_index < self.fields.len(),
            "schema '{}' has {} fields, index {local_index} is out of range",
            self.name,
            self.fields.len()
        );
        &self.fields[local_index]
    }

    /// Schema-local column index for a field id, `None` when the id is
    /// unsupported or outside the schema's id space.
    pub fn local_index_of(&self, id: u16) -> Option<usize> {
        self.index_by_id.get(usize::from(id)).copied().flatten()
    }

    pub fn is_field_supported(&self, id: u16) -> bool {
        self.local_index_of(id).is_some()
    }

    /// Case-insensitive lookup by qualified name.
    pub fn find_field_by_name(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.qualified_name.eq_ignore_ascii_case(name))
    }

    /// Grid columns for this schema placed at `first_index`, with
    /// `heading_prefix` prepended to every heading.
    pub fn grid_fields(&self, first_index: usize, heading_prefix: &str) -> Vec<GridField> {
        self.fields
            .iter()
            .enumerate()
            .map(|(local, field)| {
                GridField::new(
                    field.qualified_name.clone(),
                    format!("{heading_prefix}{}", field.heading),
                    first_index + local,
                    field.kind,
                )
            })
            .collect()
    }

    /// Initial column metadata in schema order.
    pub fn initial_states(&self, heading_prefix: &str) -> Vec<ColumnState> {
        self.fields
            .iter()
            .map(|field| ColumnState::new(format!("{heading_prefix}{}", field.heading), field.align))
            .collect()
    }

    /// One undefined placeholder value per column, in schema order.
    pub fn undefined_values(&self) -> Vec<GridValue> {
        self.fields
            .iter()
            .map(|field| field.kind.undefined_value())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_specs() -> Vec<FieldSpec> {
        vec![
            FieldSpec {
                id: 0,
                name: "Symbol",
                heading: "Symbol",
                kind: ValueKind::Symbol,
                supported: true,
            },
            FieldSpec {
                id: 1,
                name: "Last",
                heading: "Last",
                kind: ValueKind::Decimal,
                supported: true,
            },
            FieldSpec {
                id: 2,
                name: "Trend",
                heading: "Trend",
                kind: ValueKind::IntegerArray,
                supported: false,
            },
            FieldSpec {
                id: 3,
                name: "Volume",
                heading: "Volume",
                kind: ValueKind::Integer,
                supported: true,
            },
        ]
    }

    #[test]
    fn test_unsupported_fields_contribute_no_column() {
        let schema = FieldSchema::build("Quote", quote_specs(), &HeadingOverrides::new());
        assert_eq!(schema.field_count(), 3);
        assert!(schema.is_field_supported(1));
        assert!(!schema.is_field_supported(2));
        assert_eq!(schema.local_index_of(3), Some(2), "indices skip the gap");
        assert_eq!(schema.local_index_of(40), None);
    }

    #[test]
    fn test_heading_override_applies_at_build() {
        let mut overrides = HeadingOverrides::new();
        overrides.set("Quote", "Last", "Last Px");
        let schema = FieldSchema::build("Quote", quote_specs(), &overrides);
        assert_eq!(schema.field(1).heading(), "Last Px");
        assert_eq!(schema.field(0).heading(), "Symbol");
        assert_eq!(
            schema.field(1).qualified_name(),
            "Quote,Last",
            "the persisted key keeps the sourceless name"
        );
    }

    #[test]
    fn test_alignment_comes_from_the_kind() {
        let schema = FieldSchema::build("Quote", quote_specs(), &HeadingOverrides::new());
        assert_eq!(schema.field(0).align(), TextAlign::Left);
        assert_eq!(schema.field(1).align(), TextAlign::Right);
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let schema = FieldSchema::build("Quote", quote_specs(), &HeadingOverrides::new());
        assert_eq!(schema.find_field_by_name("quote,volume"), Some(2));
        assert_eq!(schema.find_field_by_name("Quote,Trend"), None);
    }

    #[test]
    fn test_grid_fields_offset_and_prefix() {
        let schema = FieldSchema::build("Quote", quote_specs(), &HeadingOverrides::new());
        let fields = schema.grid_fields(4, "Call ");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].index(), 4);
        assert_eq!(fields[2].index(), 6);
        assert_eq!(fields[1].heading(), "Call Last");
        assert_eq!(fields[1].name(), "Quote,Last");
    }

    #[test]
    fn test_undefined_values_match_kinds() {
        let schema = FieldSchema::build("Quote", quote_specs(), &HeadingOverrides::new());
        let values = schema.undefined_values();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(GridValue::is_undefined));
        assert_eq!(values[1].kind(), ValueKind::Decimal);
    }

    #[test]
    #[should_panic(expected = "declares field id 1 twice")]
    fn test_duplicate_id_panics() {
        let mut specs = quote_specs();
        specs.push(FieldSpec {
            id: 1,
            name: "LastCopy",
            heading: "Last Copy",
            kind: ValueKind::Decimal,
            supported: true,
        });
        FieldSchema::build("Quote", specs, &HeadingOverrides::new());
    }
}
