//! Option call/put pair domain.
//!
//! A pair row is a composite: the pair's own schema followed by two full
//! quote blocks, one per leg, sharing a single quote schema under "Call "
//! and "Put " heading prefixes. A market can list a strike with only one
//! side; the absent leg still owns its slice of the row and renders as
//! undefined through an [`UndefinedSource`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, Multicast, ValueKind};
use tickgrid_schema::{FieldList, FieldSchema, FieldSpec, HeadingOverrides};

use crate::domains::security::{SecurityBinding, SecurityRecord, security_schema};
use crate::record_source::{DataRecord, RecordBinding, RecordSource};
use crate::source::{UndefinedSource, ValueSource};

pub const SCHEMA_NAME: &str = "CallPut";

pub const CALL_PREFIX: &str = "Call ";
pub const PUT_PREFIX: &str = "Put ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPutField {
    Strike,
    Expiry,
    CallSymbol,
    PutSymbol,
}

impl CallPutField {
    pub const ALL: [CallPutField; 4] = [
        CallPutField::Strike,
        CallPutField::Expiry,
        CallPutField::CallSymbol,
        CallPutField::PutSymbol,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            CallPutField::Strike => "Strike",
            CallPutField::Expiry => "Expiry",
            CallPutField::CallSymbol => "CallSymbol",
            CallPutField::PutSymbol => "PutSymbol",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            CallPutField::Strike => "Strike",
            CallPutField::Expiry => "Expiry",
            CallPutField::CallSymbol => "Call",
            CallPutField::PutSymbol => "Put",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            CallPutField::Strike => ValueKind::Decimal,
            CallPutField::Expiry => ValueKind::Date,
            CallPutField::CallSymbol | CallPutField::PutSymbol => ValueKind::Symbol,
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

pub fn call_put_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, CallPutField::ALL.iter().map(|field| field.spec()), overrides)
}

/// One strike/expiry pair and its listed legs.
pub struct CallPutRecord {
    strike: Decimal,
    expiry: NaiveDate,
    call: RefCell<Option<Rc<SecurityRecord>>>,
    put: RefCell<Option<Rc<SecurityRecord>>>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<CallPutField>>,
    correctness_changed: Multicast<()>,
}

impl CallPutRecord {
    pub fn new(
        strike: Decimal,
        expiry: NaiveDate,
        call: Option<Rc<SecurityRecord>>,
        put: Option<Rc<SecurityRecord>>,
    ) -> Rc<Self> {
        Rc::new(CallPutRecord {
            strike,
            expiry,
            call: RefCell::new(call),
            put: RefCell::new(put),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn strike(&self) -> Decimal {
        self.strike
    }

    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    pub fn call(&self) -> Option<Rc<SecurityRecord>> {
        self.call.borrow().clone()
    }

    pub fn put(&self) -> Option<Rc<SecurityRecord>> {
        self.put.borrow().clone()
    }

    pub fn set_call(&self, call: Option<Rc<SecurityRecord>>) {
        *self.call.borrow_mut() = call;
        self.changed.publish(&vec![CallPutField::CallSymbol]);
    }

    pub fn set_put(&self, put: Option<Rc<SecurityRecord>>) {
        *self.put.borrow_mut() = put;
        self.changed.publish(&vec![CallPutField::PutSymbol]);
    }

    pub fn set_badness(&self, badness: Badness) {
        let before = self.badness.get().correctness();
        self.badness.set(badness);
        if badness.correctness() != before {
            self.correctness_changed.publish(&());
        }
    }
}

impl DataRecord for CallPutRecord {
    type Field = CallPutField;

    fn changed(&self) -> &Multicast<Vec<CallPutField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: CallPutField) -> u16 {
        field.code()
    }
}

pub struct CallPutBinding {
    record: Rc<CallPutRecord>,
    schema: Rc<FieldSchema>,
}

impl CallPutBinding {
    pub fn new(record: Rc<CallPutRecord>, schema: Rc<FieldSchema>) -> Self {
        CallPutBinding { record, schema }
    }
}

impl RecordBinding for CallPutBinding {
    type Record = CallPutRecord;

    fn record(&self) -> &Rc<CallPutRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = CallPutField::from_code(code) else {
            panic!("CallPut schema has no field code {code}");
        };
        match field {
            CallPutField::Strike => GridValue::decimal(self.record.strike),
            CallPutField::Expiry => GridValue::date(self.record.expiry),
            CallPutField::CallSymbol => GridValue::symbol_opt(
                self.record.call.borrow().as_ref().map(|leg| leg.symbol().clone()),
            ),
            CallPutField::PutSymbol => GridValue::symbol_opt(
                self.record.put.borrow().as_ref().map(|leg| leg.symbol().clone()),
            ),
        }
    }
}

/// A fully composed pair row: the field list carving up the index space and
/// one source per block, in field list order.
pub struct CallPutRow {
    pub field_list: FieldList,
    pub sources: Vec<Box<dyn ValueSource>>,
}

fn leg_source(
    leg: Option<Rc<SecurityRecord>>,
    schema: &Rc<FieldSchema>,
    first_index: usize,
) -> Box<dyn ValueSource> {
    match leg {
        Some(record) => Box::new(RecordSource::new(
            SecurityBinding::new(record, Rc::clone(schema)),
            first_index,
        )),
        None => Box::new(UndefinedSource::new(Rc::clone(schema), first_index)),
    }
}

/// Builds the three-block row for one pair record. Legs missing from the
/// market come out as [`UndefinedSource`] blocks over the shared quote
/// schema.
pub fn call_put_row(record: &Rc<CallPutRecord>, overrides: &HeadingOverrides) -> CallPutRow {
    let pair_schema = Rc::new(call_put_schema(overrides));
    let quote_schema = Rc::new(security_schema(overrides));

    let mut field_list = FieldList::new();
    let pair_first = field_list.add_schema(Rc::clone(&pair_schema), "");
    let call_first = field_list.add_schema(Rc::clone(&quote_schema), CALL_PREFIX);
    let put_first = field_list.add_schema(Rc::clone(&quote_schema), PUT_PREFIX);

    let sources: Vec<Box<dyn ValueSource>> = vec![
        Box::new(RecordSource::new(
            CallPutBinding::new(Rc::clone(record), pair_schema),
            pair_first,
        )),
        leg_source(record.call(), &quote_schema, call_first),
        leg_source(record.put(), &quote_schema, put_first),
    ];

    CallPutRow { field_list, sources }
}
