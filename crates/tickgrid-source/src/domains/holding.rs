//! Position holding domain.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, Multicast, SymbolId, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Holding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingField {
    Account,
    Symbol,
    Style,
    Quantity,
    AveragePrice,
    Cost,
}

impl HoldingField {
    pub const ALL: [HoldingField; 6] = [
        HoldingField::Account,
        HoldingField::Symbol,
        HoldingField::Style,
        HoldingField::Quantity,
        HoldingField::AveragePrice,
        HoldingField::Cost,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            HoldingField::Account => "Account",
            HoldingField::Symbol => "Symbol",
            HoldingField::Style => "Style",
            HoldingField::Quantity => "Quantity",
            HoldingField::AveragePrice => "AveragePrice",
            HoldingField::Cost => "Cost",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            HoldingField::Account => "Account",
            HoldingField::Symbol => "Symbol",
            HoldingField::Style => "Style",
            HoldingField::Quantity => "Qty",
            HoldingField::AveragePrice => "Avg Price",
            HoldingField::Cost => "Cost",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            HoldingField::Account | HoldingField::Style => ValueKind::Text,
            HoldingField::Symbol => ValueKind::Symbol,
            HoldingField::Quantity => ValueKind::Integer,
            HoldingField::AveragePrice | HoldingField::Cost => ValueKind::Decimal,
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

pub fn holding_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, HoldingField::ALL.iter().map(|field| field.spec()), overrides)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingStyle {
    Cash,
    Margin,
    Short,
}

impl HoldingStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            HoldingStyle::Cash => "Cash",
            HoldingStyle::Margin => "Margin",
            HoldingStyle::Short => "Short",
        }
    }
}

impl fmt::Display for HoldingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incremental holding update. `average_price` is null while the
/// position is flat, so the member carries a double option.
#[derive(Debug, Default, Clone)]
pub struct HoldingUpdate {
    pub quantity: Option<i64>,
    pub average_price: Option<Option<Decimal>>,
    pub cost: Option<Decimal>,
}

/// A position in one security for one account.
pub struct HoldingRecord {
    account: String,
    symbol: SymbolId,
    style: HoldingStyle,
    quantity: Cell<i64>,
    average_price: Cell<Option<Decimal>>,
    cost: Cell<Decimal>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<HoldingField>>,
    correctness_changed: Multicast<()>,
}

impl HoldingRecord {
    pub fn new(
        account: impl Into<String>,
        symbol: SymbolId,
        style: HoldingStyle,
        quantity: i64,
        average_price: Option<Decimal>,
        cost: Decimal,
    ) -> Rc<Self> {
        Rc::new(HoldingRecord {
            account: account.into(),
            symbol,
            style,
            quantity: Cell::new(quantity),
            average_price: Cell::new(average_price),
            cost: Cell::new(cost),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn symbol(&self) -> &SymbolId {
        &self.symbol
    }

    pub fn quantity(&self) -> i64 {
        self.quantity.get()
    }

    pub fn apply(&self, update: &HoldingUpdate) {
        let mut fields = Vec::new();
        if let Some(quantity) = update.quantity
            && quantity != self.quantity.get()
        {
            self.quantity.set(quantity);
            fields.push(HoldingField::Quantity);
        }
        if let Some(average_price) = update.average_price
            && average_price != self.average_price.get()
        {
            self.average_price.set(average_price);
            fields.push(HoldingField::AveragePrice);
        }
        if let Some(cost) = update.cost
            && cost != self.cost.get()
        {
            self.cost.set(cost);
            fields.push(HoldingField::Cost);
        }
        if !fields.is_empty() {
            self.changed.publish(&fields);
        }
    }

    pub fn set_badness(&self, badness: Badness) {
        let before = self.badness.get().correctness();
        self.badness.set(badness);
        if badness.correctness() != before {
            self.correctness_changed.publish(&());
        }
    }
}

impl DataRecord for HoldingRecord {
    type Field = HoldingField;

    fn changed(&self) -> &Multicast<Vec<HoldingField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: HoldingField) -> u16 {
        field.code()
    }
}

pub struct HoldingBinding {
    record: Rc<HoldingRecord>,
    schema: Rc<FieldSchema>,
}

impl HoldingBinding {
    pub fn new(record: Rc<HoldingRecord>, schema: Rc<FieldSchema>) -> Self {
        HoldingBinding { record, schema }
    }
}

impl RecordBinding for HoldingBinding {
    type Record = HoldingRecord;

    fn record(&self) -> &Rc<HoldingRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = HoldingField::from_code(code) else {
            panic!("Holding schema has no field code {code}");
        };
        match field {
            HoldingField::Account => GridValue::text(self.record.account.clone()),
            HoldingField::Symbol => GridValue::symbol(self.record.symbol.clone()),
            HoldingField::Style => GridValue::text(self.record.style.as_str()),
            HoldingField::Quantity => GridValue::integer(self.record.quantity.get()),
            HoldingField::AveragePrice => GridValue::decimal_opt(self.record.average_price.get()),
            HoldingField::Cost => GridValue::decimal(self.record.cost.get()),
        }
    }
}
