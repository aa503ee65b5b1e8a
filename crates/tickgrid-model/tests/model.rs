//! Integration tests for the value model: quality propagation, presence
//! ordering and the cached render projection working together.

use proptest::prelude::*;
use std::cmp::Ordering;
use std::rc::Rc;
use tickgrid_model::{
    Badness, CellValue, Correctness, GridField, GridRow, GridValue, RenderAttr, ValueKind,
};

#[test]
fn test_quality_walk_updates_attrs_and_projection() {
    let mut value = GridValue::integer(4250);

    value.set_correctness(Badness::FeedSuspect.correctness());
    let suspect = value.render();
    assert_eq!(suspect.text, "4250");
    assert!(suspect.has_attr(RenderAttr::DataSuspect));

    value.set_correctness(Badness::FeedError.correctness());
    let error = value.render();
    assert!(error.has_attr(RenderAttr::DataError));
    assert!(!error.has_attr(RenderAttr::DataSuspect));

    value.set_correctness(Badness::NotBad.correctness());
    let good = value.render();
    assert!(good.attrs.is_empty());
    assert!(
        !Rc::ptr_eq(&suspect, &good),
        "projections from different quality states must be distinct"
    );
}

#[test]
fn test_sort_groups_presence_blocks_before_values() {
    let field = GridField::new("Order,Limit", "Limit", 0, ValueKind::Integer);
    let mut rows = vec![
        GridRow::new(vec![GridValue::integer(5)]),
        GridRow::undefined([ValueKind::Integer]),
        GridRow::new(vec![GridValue::integer_opt(None)]),
        GridRow::new(vec![GridValue::integer(-3)]),
        GridRow::undefined([ValueKind::Integer]),
    ];
    rows.sort_by(|a, b| field.compare(a, b));
    let states: Vec<_> = rows
        .iter()
        .map(|row| {
            let value = row.value(0);
            (value.is_undefined(), value.is_null(), value.is_defined())
        })
        .collect();
    assert_eq!(
        states,
        vec![
            (true, false, false),
            (true, false, false),
            (false, true, false),
            (false, false, true),
            (false, false, true),
        ]
    );
}

#[test]
fn test_row_keeps_cached_projection_until_change_lands() {
    let mut row = GridRow::new(vec![GridValue::text("BHP.ASX"), GridValue::integer(100)]);
    let first = row.render(1);
    assert!(Rc::ptr_eq(&first, &row.render(1)));

    row.apply_change(1, GridValue::integer(105));
    let second = row.render(1);
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.text, "105");

    let untouched = row.render(0);
    assert!(Rc::ptr_eq(&untouched, &row.render(0)));
}

/// Encodes the three presence states over an `i64` payload for property
/// tests: `None` is undefined, `Some(None)` null, `Some(Some(n))` defined.
fn cell_from(state: Option<Option<i64>>) -> CellValue<i64> {
    match state {
        None => CellValue::undefined(),
        Some(None) => CellValue::null(),
        Some(Some(value)) => CellValue::defined(value),
    }
}

fn presence_strategy() -> impl Strategy<Value = Option<Option<i64>>> {
    prop_oneof![
        Just(None),
        Just(Some(None)),
        any::<i64>().prop_map(|value| Some(Some(value))),
    ]
}

proptest! {
    #[test]
    fn prop_cell_compare_is_antisymmetric(
        a in presence_strategy(),
        b in presence_strategy(),
    ) {
        let (a, b) = (cell_from(a), cell_from(b));
        prop_assert_eq!(a.compare(&b), b.compare(&a).reverse());
    }

    #[test]
    fn prop_cell_compare_is_transitive(
        a in presence_strategy(),
        b in presence_strategy(),
        c in presence_strategy(),
    ) {
        let (a, b, c) = (cell_from(a), cell_from(b), cell_from(c));
        if a.compare(&b) != Ordering::Greater && b.compare(&c) != Ordering::Greater {
            prop_assert_ne!(a.compare(&c), Ordering::Greater);
        }
    }

    #[test]
    fn prop_direction_matches_numeric_movement(old in any::<i64>(), new in any::<i64>()) {
        let previous = GridValue::integer(old);
        let current = GridValue::integer(new);
        let expected = match new.cmp(&old) {
            Ordering::Greater => Some(RenderAttr::ValueIncreased),
            Ordering::Less => Some(RenderAttr::ValueDecreased),
            Ordering::Equal => None,
        };
        prop_assert_eq!(current.direction_since(&previous), expected);
    }

    #[test]
    fn prop_merge_is_associative_and_commutative(
        a in 0_u8..4, b in 0_u8..4, c in 0_u8..4,
    ) {
        let level = |n: u8| match n {
            0 => Correctness::Good,
            1 => Correctness::Usable,
            2 => Correctness::Suspect,
            _ => Correctness::Error,
        };
        let (a, b, c) = (level(a), level(b), level(c));
        prop_assert_eq!(
            Correctness::merge(a, Correctness::merge(b, c)),
            Correctness::merge(Correctness::merge(a, b), c)
        );
        prop_assert_eq!(Correctness::merge(a, b), Correctness::merge(b, a));
        prop_assert_eq!(Correctness::merge3(a, b, c), Correctness::merge(Correctness::merge(a, b), c));
    }
}
