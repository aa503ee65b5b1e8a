//! Brokerage account domain.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tickgrid_model::{Badness, Correctness, GridValue, Multicast, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Account";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    AccountId,
    Name,
    Currency,
    Broker,
    Branch,
}

impl AccountField {
    pub const ALL: [AccountField; 5] = [
        AccountField::AccountId,
        AccountField::Name,
        AccountField::Currency,
        AccountField::Broker,
        AccountField::Branch,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            AccountField::AccountId => "AccountId",
            AccountField::Name => "Name",
            AccountField::Currency => "Currency",
            AccountField::Broker => "Broker",
            AccountField::Branch => "Branch",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            AccountField::AccountId => "Account",
            AccountField::Name => "Name",
            AccountField::Currency => "Ccy",
            AccountField::Broker => "Broker",
            AccountField::Branch => "Branch",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            AccountField::AccountId
            | AccountField::Name
            | AccountField::Currency
            | AccountField::Broker
            | AccountField::Branch => ValueKind::Text,
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

pub fn account_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, AccountField::ALL.iter().map(|field| field.spec()), overrides)
}

/// A live brokerage account record.
pub struct AccountRecord {
    account_id: String,
    name: RefCell<String>,
    currency: String,
    broker: RefCell<String>,
    branch: RefCell<String>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<AccountField>>,
    correctness_changed: Multicast<()>,
}

impl AccountRecord {
    pub fn new(
        account_id: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        broker: impl Into<String>,
        branch: impl Into<String>,
    ) -> Rc<Self> {
        Rc::new(AccountRecord {
            account_id: account_id.into(),
            name: RefCell::new(name.into()),
            currency: currency.into(),
            broker: RefCell::new(broker.into()),
            branch: RefCell::new(branch.into()),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
        self.changed.publish(&vec![AccountField::Name]);
    }

    /// Broker and branch move together when an account is reassigned; the
    /// two ids go out in one event.
    pub fn set_broker_branch(&self, broker: impl Into<String>, branch: impl Into<String>) {
        *self.broker.borrow_mut() = broker.into();
        *self.branch.borrow_mut() = branch.into();
        self.changed
            .publish(&vec![AccountField::Broker, AccountField::Branch]);
    }

    pub fn badness(&self) -> Badness {
        self.badness.get()
    }

    pub fn set_badness(&self, badness: Badness) {
        let before = self.badness.get().correctness();
        self.badness.set(badness);
        if badness.correctness() != before {
            self.correctness_changed.publish(&());
        }
    }
}

impl DataRecord for AccountRecord {
    type Field = AccountField;

    fn changed(&self) -> &Multicast<Vec<AccountField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: AccountField) -> u16 {
        field.code()
    }
}

pub struct AccountBinding {
    record: Rc<AccountRecord>,
    schema: Rc<FieldSchema>,
}

impl AccountBinding {
    pub fn new(record: Rc<AccountRecord>, schema: Rc<FieldSchema>) -> Self {
        AccountBinding { record, schema }
    }
}

impl RecordBinding for AccountBinding {
    type Record = AccountRecord;

    fn record(&self) -> &Rc<AccountRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = AccountField::from_code(code) else {
            panic!("Account schema has no field code {code}");
        };
        match field {
            AccountField::AccountId => GridValue::text(self.record.account_id.clone()),
            AccountField::Name => GridValue::text(self.record.name.borrow().clone()),
            AccountField::Currency => GridValue::text(self.record.currency.clone()),
            AccountField::Broker => GridValue::text(self.record.broker.borrow().clone()),
            AccountField::Branch => GridValue::text(self.record.branch.borrow().clone()),
        }
    }
}
