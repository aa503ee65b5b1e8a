//! Account balance domain.

use std::cell::Cell;
use std::rc::Rc;

use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, Multicast, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Balance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceField {
    Account,
    Currency,
    NetBalance,
    TradingBalance,
    UnfilledBuys,
}

impl BalanceField {
    pub const ALL: [BalanceField; 5] = [
        BalanceField::Account,
        BalanceField::Currency,
        BalanceField::NetBalance,
        BalanceField::TradingBalance,
        BalanceField::UnfilledBuys,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            BalanceField::Account => "Account",
            BalanceField::Currency => "Currency",
            BalanceField::NetBalance => "NetBalance",
            BalanceField::TradingBalance => "TradingBalance",
            BalanceField::UnfilledBuys => "UnfilledBuys",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            BalanceField::Account => "Account",
            BalanceField::Currency => "Ccy",
            BalanceField::NetBalance => "Net",
            BalanceField::TradingBalance => "Trading",
            BalanceField::UnfilledBuys => "Unfilled Buys",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            BalanceField::Account | BalanceField::Currency => ValueKind::Text,
            BalanceField::NetBalance | BalanceField::TradingBalance | BalanceField::UnfilledBuys => {
                ValueKind::Decimal
            }
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

pub fn balance_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, BalanceField::ALL.iter().map(|field| field.spec()), overrides)
}

/// One incremental balance update from the trading server.
#[derive(Debug, Default, Clone)]
pub struct BalanceUpdate {
    pub net_balance: Option<Decimal>,
    pub trading_balance: Option<Decimal>,
    pub unfilled_buys: Option<Option<Decimal>>,
}

/// One currency balance for one account.
pub struct BalanceRecord {
    account: String,
    currency: String,
    net_balance: Cell<Decimal>,
    trading_balance: Cell<Decimal>,
    unfilled_buys: Cell<Option<Decimal>>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<BalanceField>>,
    correctness_changed: Multicast<()>,
}

impl BalanceRecord {
    pub fn new(
        account: impl Into<String>,
        currency: impl Into<String>,
        net_balance: Decimal,
        trading_balance: Decimal,
    ) -> Rc<Self> {
        Rc::new(BalanceRecord {
            account: account.into(),
            currency: currency.into(),
            net_balance: Cell::new(net_balance),
            trading_balance: Cell::new(trading_balance),
            unfilled_buys: Cell::new(None),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn net_balance(&self) -> Decimal {
        self.net_balance.get()
    }

    pub fn apply(&self, update: &BalanceUpdate) {
        let mut fields = Vec::new();
        if let Some(net_balance) = update.net_balance
            && net_balance != self.net_balance.get()
        {
            self.net_balance.set(net_balance);
            fields.push(BalanceField::NetBalance);
        }
        if let Some(trading_balance) = update.trading_balance
            && trading_balance != self.trading_balance.get()
        {
            self.trading_balance.set(trading_balance);
            fields.push(BalanceField::TradingBalance);
        }
        if let Some(unfilled_buys) = update.unfilled_buys
            && unfilled_buys != self.unfilled_buys.get()
        {
            self.unfilled_buys.set(unfilled_buys);
            fields.push(BalanceField::UnfilledBuys);
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

impl DataRecord for BalanceRecord {
    type Field = BalanceField;

    fn changed(&self) -> &Multicast<Vec<BalanceField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: BalanceField) -> u16 {
        field.code()
    }
}

pub struct BalanceBinding {
    record: Rc<BalanceRecord>,
    schema: Rc<FieldSchema>,
}

impl BalanceBinding {
    pub fn new(record: Rc<BalanceRecord>, schema: Rc<FieldSchema>) -> Self {
        BalanceBinding { record, schema }
    }
}

impl RecordBinding for BalanceBinding {
    type Record = BalanceRecord;

    fn record(&self) -> &Rc<BalanceRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = BalanceField::from_code(code) else {
            panic!("Balance schema has no field code {code}");
        };
        match field {
            BalanceField::Account => GridValue::text(self.record.account.clone()),
            BalanceField::Currency => GridValue::text(self.record.currency.clone()),
            BalanceField::NetBalance => GridValue::decimal(self.record.net_balance.get()),
            BalanceField::TradingBalance => GridValue::decimal(self.record.trading_balance.get()),
            BalanceField::UnfilledBuys => GridValue::decimal_opt(self.record.unfilled_buys.get()),
        }
    }
}
