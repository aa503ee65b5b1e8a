//! Top-shareholder register domain.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tickgrid_model::{Badness, Correctness, GridValue, Multicast, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Shareholder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareholderField {
    Name,
    Designation,
    Holding,
    ChangeInHolding,
}

impl ShareholderField {
    pub const ALL: [ShareholderField; 4] = [
        ShareholderField::Name,
        ShareholderField::Designation,
        ShareholderField::Holding,
        ShareholderField::ChangeInHolding,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            ShareholderField::Name => "Name",
            ShareholderField::Designation => "Designation",
            ShareholderField::Holding => "Holding",
            ShareholderField::ChangeInHolding => "ChangeInHolding",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            ShareholderField::Name => "Shareholder",
            ShareholderField::Designation => "Designation",
            ShareholderField::Holding => "Held",
            ShareholderField::ChangeInHolding => "Change",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            ShareholderField::Name | ShareholderField::Designation => ValueKind::Text,
            ShareholderField::Holding | ShareholderField::ChangeInHolding => ValueKind::Integer,
        }
    }

    fn spec(self) -> FieldSpec {
        FieldSpec {
            id: self.code(),
            name: self.name(),
            heading: self.heading(),
            kind: self.kind(),
            supported: true,
        }
    }
}

pub fn shareholder_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(
        SCHEMA_NAME,
        ShareholderField::ALL.iter().map(|field| field.spec()),
        overrides,
    )
}

/// One entry in a security's top-shareholder register.
///
/// `ChangeInHolding` is null until a second register report arrives; a null
/// there means "no prior report", not a change of zero.
pub struct ShareholderRecord {
    name: String,
    designation: RefCell<String>,
    holding: Cell<i64>,
    change_in_holding: Cell<Option<i64>>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<ShareholderField>>,
    correctness_changed: Multicast<()>,
}

impl ShareholderRecord {
    pub fn new(name: impl Into<String>, designation: impl Into<String>, holding: i64) -> Rc<Self> {
        Rc::new(ShareholderRecord {
            name: name.into(),
            designation: RefCell::new(designation.into()),
            holding: Cell::new(holding),
            change_in_holding: Cell::new(None),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn holding(&self) -> i64 {
        self.holding.get()
    }

    /// Records a new register report. The change column is derived from the
    /// previous holding and published together with the holding itself.
    pub fn report_holding(&self, holding: i64) {
        let previous = self.holding.get();
        self.holding.set(holding);
        self.change_in_holding.set(Some(holding - previous));
        self.changed
            .publish(&vec![ShareholderField::Holding, ShareholderField::ChangeInHolding]);
    }

    pub fn set_designation(&self, designation: impl Into<String>) {
        *self.designation.borrow_mut() = designation.into();
        self.changed.publish(&vec![ShareholderField::Designation]);
    }

    pub fn set_badness(&self, badness: Badness) {
        let before = self.badness.get().correctness();
        self.badness.set(badness);
        if badness.correctness() != before {
            self.correctness_changed.publish(&());
        }
    }
}

impl DataRecord for ShareholderRecord {
    type Field = ShareholderField;

    fn changed(&self) -> &Multicast<Vec<ShareholderField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: ShareholderField) -> u16 {
        field.code()
    }
}

pub struct ShareholderBinding {
    record: Rc<ShareholderRecord>,
    schema: Rc<FieldSchema>,
}

impl ShareholderBinding {
    pub fn new(record: Rc<ShareholderRecord>, schema: Rc<FieldSchema>) -> Self {
        ShareholderBinding { record, schema }
    }
}

impl RecordBinding for ShareholderBinding {
    type Record = ShareholderRecord;

    fn record(&self) -> &Rc<ShareholderRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = ShareholderField::from_code(code) else {
            panic!("Shareholder schema has no field code {code}");
        };
        match field {
            ShareholderField::Name => GridValue::text(self.record.name.clone()),
            ShareholderField::Designation => {
                GridValue::text(self.record.designation.borrow().clone())
            }
            ShareholderField::Holding => GridValue::integer(self.record.holding.get()),
            ShareholderField::ChangeInHolding => {
                GridValue::integer_opt(self.record.change_in_holding.get())
            }
        }
    }
}
