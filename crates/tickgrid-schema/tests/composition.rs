//! Integration tests for column-space composition: contiguous offsets,
//! range resolution, and the stability of qualified names under overrides.

use proptest::prelude::*;
use std::rc::Rc;
use tickgrid_model::ValueKind;
use tickgrid_schema::{FieldList, FieldSchema, FieldSpec, HeadingOverrides};

const FIELD_NAMES: [&str; 12] = [
    "F0", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11",
];

fn synthetic_schema(name: String, field_count: usize) -> Rc<FieldSchema> {
    let specs: Vec<FieldSpec> = (0..field_count)
        .map(|id| FieldSpec {
            id: u16::try_from(id).unwrap(),
            name: FIELD_NAMES[id],
            heading: "Field",
            kind: ValueKind::Integer,
            supported: true,
        })
        .collect();
    Rc::new(FieldSchema::build(name, specs, &HeadingOverrides::new()))
}

#[test]
fn test_override_changes_heading_but_not_the_persisted_key() {
    let mut overrides = HeadingOverrides::new();
    overrides.set("Quote", "F1", "Renamed");

    let specs = (0..3).map(|id| FieldSpec {
        id,
        name: ["F0", "F1", "F2"][usize::from(id)],
        heading: "Original",
        kind: ValueKind::Decimal,
        supported: true,
    });
    let schema = Rc::new(FieldSchema::build("Quote", specs, &overrides));

    let mut list = FieldList::new();
    list.add_schema(schema, "");
    assert_eq!(list.field_heading(1), "Renamed");
    assert_eq!(list.field_name(1), "Quote,F1");
    assert_eq!(list.find_field_by_name("Quote,F1"), Some(1));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Block offsets are the running sum of earlier block sizes, and every
    /// global index resolves to exactly one schema with a consistent local
    /// index.
    #[test]
    fn prop_offsets_partition_the_index_space(sizes in prop::collection::vec(1_usize..12, 1..6)) {
        let mut list = FieldList::new();
        let mut expected_first = Vec::new();
        let mut running_total = 0;

        for (position, &size) in sizes.iter().enumerate() {
            let first = list.add_schema(synthetic_schema(format!("S{position}"), size), "");
            expected_first.push(first);
            prop_assert_eq!(first, running_total);
            running_total += size;
        }
        prop_assert_eq!(list.field_count(), running_total);

        for global in 0..running_total {
            let (position, local) = list.locate(global);
            prop_assert_eq!(global, expected_first[position] + local);
            prop_assert!(local < sizes[position]);
        }
    }
}
