//! The generic cell: raw datum, quality, attributes and the cached render
//! projection.

use crate::correctness::Correctness;
use crate::datum::Datum;
use crate::render::{RenderAttr, RenderValue};
use std::cmp::Ordering;
use std::rc::Rc;

/// Presence state of a cell's datum.
///
/// One ordering rule applies everywhere in the grid:
/// `Undefined < Null < Defined`. Undefined means the value has never been
/// supplied (no backing record, or the source is not active); null means the
/// record supplied an explicit no-value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellData<D> {
    Undefined,
    Null,
    Defined(D),
}

impl<D> CellData<D> {
    pub fn is_undefined(&self) -> bool {
        matches!(self, CellData::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellData::Null)
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, CellData::Defined(_))
    }

    pub fn as_defined(&self) -> Option<&D> {
        match self {
            CellData::Defined(value) => Some(value),
            CellData::Undefined | CellData::Null => None,
        }
    }

    /// Position in the global presence order.
    fn rank(&self) -> u8 {
        match self {
            CellData::Undefined => 0,
            CellData::Null => 1,
            CellData::Defined(_) => 2,
        }
    }
}

/// One grid cell at a concrete datum type.
///
/// Holds the raw datum, the data-quality level, the visual attributes and a
/// lazily built, explicitly cached render projection. Every mutation of
/// data or attributes invalidates the cache; repeated reads between
/// mutations return the identical `Rc` so the grid can cheaply detect
/// "nothing to repaint".
#[derive(Debug, Clone)]
pub struct CellValue<D: Datum> {
    data: CellData<D>,
    correctness: Correctness,
    attrs: Vec<RenderAttr>,
    cached: Option<Rc<RenderValue>>,
}

impl<D: Datum> CellValue<D> {
    pub fn undefined() -> Self {
        CellValue {
            data: CellData::Undefined,
            correctness: Correctness::Good,
            attrs: Vec::new(),
            cached: None,
        }
    }

    pub fn null() -> Self {
        CellValue {
            data: CellData::Null,
            correctness: Correctness::Good,
            attrs: Vec::new(),
            cached: None,
        }
    }

    pub fn defined(value: D) -> Self {
        CellValue {
            data: CellData::Defined(value),
            correctness: Correctness::Good,
            attrs: Vec::new(),
            cached: None,
        }
    }

    /// Builds from an optional datum, mapping `None` to the null state.
    pub fn nullable(value: Option<D>) -> Self {
        match value {
            Some(value) => CellValue::defined(value),
            None => CellValue::null(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.data.is_undefined()
    }

    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    pub fn is_defined(&self) -> bool {
        self.data.is_defined()
    }

    pub fn data(&self) -> &CellData<D> {
        &self.data
    }

    /// The defined datum, if any.
    pub fn value(&self) -> Option<&D> {
        self.data.as_defined()
    }

    pub fn set_data(&mut self, value: D) {
        self.data = CellData::Defined(value);
        self.cached = None;
    }

    pub fn set_null(&mut self) {
        self.data = CellData::Null;
        self.cached = None;
    }

    pub fn clear_data(&mut self) {
        self.data = CellData::Undefined;
        self.cached = None;
    }

    pub fn correctness(&self) -> Correctness {
        self.correctness
    }

    /// Sets the quality level and maintains the matching visual attribute:
    /// `Suspect` and `Error` levels carry `DataSuspect`/`DataError`, better
    /// levels carry neither. Setting the current level again is a no-op and
    /// keeps the cached projection.
    pub fn set_correctness(&mut self, level: Correctness) {
        if level == self.correctness {
            return;
        }
        self.correctness = level;
        self.attrs
            .retain(|attr| !matches!(attr, RenderAttr::DataSuspect | RenderAttr::DataError));
        match level {
            Correctness::Suspect => self.attrs.push(RenderAttr::DataSuspect),
            Correctness::Error => self.attrs.push(RenderAttr::DataError),
            Correctness::Good | Correctness::Usable => {}
        }
        self.cached = None;
    }

    /// Adds a visual attribute if not already present.
    pub fn add_attr(&mut self, attr: RenderAttr) {
        if !self.attrs.contains(&attr) {
            self.attrs.push(attr);
            self.cached = None;
        }
    }

    pub fn attrs(&self) -> &[RenderAttr] {
        &self.attrs
    }

    /// The cached projection, building it on first access.
    ///
    /// Undefined and null cells render as empty text; they differ only in
    /// state queries and comparison. Consecutive calls without an
    /// intervening mutation return the identical `Rc`.
    pub fn render(&mut self) -> Rc<RenderValue> {
        if let Some(cached) = &self.cached {
            return Rc::clone(cached);
        }
        let text = match &self.data {
            CellData::Defined(value) => value.render_text(),
            CellData::Undefined | CellData::Null => String::new(),
        };
        let built = Rc::new(RenderValue::new(text, self.attrs.clone()));
        self.cached = Some(Rc::clone(&built));
        built
    }

    /// The cached projection without building one.
    pub fn peek_render(&self) -> Option<&Rc<RenderValue>> {
        self.cached.as_ref()
    }

    pub fn clear_render(&mut self) {
        self.cached = None;
    }

    /// Presence rank first (`Undefined < Null < Defined`), then the datum's
    /// own order when both sides are defined.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (&self.data, &other.data) {
            (CellData::Defined(a), CellData::Defined(b)) => a.cmp_datum(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_order_undefined_null_defined() {
        let undefined: CellValue<i64> = CellValue::undefined();
        let null: CellValue<i64> = CellValue::null();
        let defined = CellValue::defined(-5_i64);
        assert_eq!(undefined.compare(&null), Ordering::Less);
        assert_eq!(null.compare(&defined), Ordering::Less);
        assert_eq!(undefined.compare(&defined), Ordering::Less);
        assert_eq!(null.compare(&null), Ordering::Equal);
    }

    #[test]
    fn test_defined_cells_compare_by_datum() {
        let a = CellValue::defined(3_i64);
        let b = CellValue::defined(11_i64);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
    }

    #[test]
    fn test_render_is_cached_until_mutation() {
        let mut cell = CellValue::defined("alpha".to_owned());
        let first = cell.render();
        let second = cell.render();
        assert!(Rc::ptr_eq(&first, &second), "repeat reads share the cache");

        cell.set_data("beta".to_owned());
        assert!(cell.peek_render().is_none());
        let third = cell.render();
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(third.text, "beta");
    }

    #[test]
    fn test_undefined_and_null_render_empty() {
        let mut undefined: CellValue<String> = CellValue::undefined();
        let mut null: CellValue<String> = CellValue::null();
        assert_eq!(undefined.render().text, "");
        assert_eq!(null.render().text, "");
    }

    #[test]
    fn test_correctness_maintains_quality_attrs() {
        let mut cell = CellValue::defined(7_i64);
        cell.set_correctness(Correctness::Suspect);
        assert_eq!(cell.attrs(), &[RenderAttr::DataSuspect]);

        cell.set_correctness(Correctness::Error);
        assert_eq!(cell.attrs(), &[RenderAttr::DataError]);

        cell.set_correctness(Correctness::Good);
        assert!(cell.attrs().is_empty());
    }

    #[test]
    fn test_same_correctness_keeps_cache() {
        let mut cell = CellValue::defined(7_i64);
        cell.set_correctness(Correctness::Suspect);
        let first = cell.render();
        cell.set_correctness(Correctness::Suspect);
        let second = cell.render();
        assert!(Rc::ptr_eq(&first, &second));

        cell.set_correctness(Correctness::Good);
        let third = cell.render();
        assert!(!Rc::ptr_eq(&first, &third));
        assert!(third.attrs.is_empty());
    }

    #[test]
    fn test_quality_attr_survives_alongside_direction() {
        let mut cell = CellValue::defined(7_i64);
        cell.set_correctness(Correctness::Suspect);
        cell.add_attr(RenderAttr::ValueIncreased);
        cell.set_correctness(Correctness::Good);
        assert_eq!(cell.attrs(), &[RenderAttr::ValueIncreased]);
    }

    #[test]
    fn test_add_attr_is_idempotent() {
        let mut cell = CellValue::defined(7_i64);
        cell.add_attr(RenderAttr::ValueIncreased);
        let rendered = cell.render();
        cell.add_attr(RenderAttr::ValueIncreased);
        assert!(cell.peek_render().is_some());
        assert_eq!(rendered.attrs, vec![RenderAttr::ValueIncreased]);
    }

    #[test]
    fn test_nullable_maps_none_to_null() {
        let some = CellValue::nullable(Some(5_i64));
        let none: CellValue<i64> = CellValue::nullable(None);
        assert!(some.is_defined());
        assert!(none.is_null());
    }
}
