//! Market data feed domain.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tickgrid_model::{Badness, Correctness, GridValue, Multicast, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Feed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedField {
    FeedId,
    Name,
    Class,
    Status,
}

impl FeedField {
    pub const ALL: [FeedField; 4] = [
        FeedField::FeedId,
        FeedField::Name,
        FeedField::Class,
        FeedField::Status,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            FeedField::FeedId => "FeedId",
            FeedField::Name => "Name",
            FeedField::Class => "Class",
            FeedField::Status => "Status",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            FeedField::FeedId => "Feed",
            FeedField::Name => "Name",
            FeedField::Class => "Class",
            FeedField::Status => "Status",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            FeedField::FeedId | FeedField::Name | FeedField::Class | FeedField::Status => {
                ValueKind::Text
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

pub fn feed_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, FeedField::ALL.iter().map(|field| field.spec()), overrides)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedClass {
    Trading,
    News,
    Depth,
}

impl FeedClass {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedClass::Trading => "Trading",
            FeedClass::News => "News",
            FeedClass::Depth => "Depth",
        }
    }
}

impl fmt::Display for FeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Starting,
    Up,
    Degraded,
    Down,
}

impl FeedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedStatus::Starting => "Starting",
            FeedStatus::Up => "Up",
            FeedStatus::Degraded => "Degraded",
            FeedStatus::Down => "Down",
        }
    }
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live feed status record.
pub struct FeedRecord {
    feed_id: String,
    name: String,
    class: FeedClass,
    status: Cell<FeedStatus>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<FeedField>>,
    correctness_changed: Multicast<()>,
}

impl FeedRecord {
    pub fn new(feed_id: impl Into<String>, name: impl Into<String>, class: FeedClass) -> Rc<Self> {
        Rc::new(FeedRecord {
            feed_id: feed_id.into(),
            name: name.into(),
            class,
            status: Cell::new(FeedStatus::Starting),
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    pub fn status(&self) -> FeedStatus {
        self.status.get()
    }

    pub fn set_status(&self, status: FeedStatus) {
        if self.status.get() == status {
            return;
        }
        self.status.set(status);
        self.changed.publish(&vec![FeedField::Status]);
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

impl DataRecord for FeedRecord {
    type Field = FeedField;

    fn changed(&self) -> &Multicast<Vec<FeedField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: FeedField) -> u16 {
        field.code()
    }
}

pub struct FeedBinding {
    record: Rc<FeedRecord>,
    schema: Rc<FieldSchema>,
}

impl FeedBinding {
    pub fn new(record: Rc<FeedRecord>, schema: Rc<FieldSchema>) -> Self {
        FeedBinding { record, schema }
    }
}

impl RecordBinding for FeedBinding {
    type Record = FeedRecord;

    fn record(&self) -> &Rc<FeedRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = FeedField::from_code(code) else {
            panic!("Feed schema has no field code {code}");
        };
        match field {
            FeedField::FeedId => GridValue::text(self.record.feed_id.clone()),
            FeedField::Name => GridValue::text(self.record.name.clone()),
            FeedField::Class => GridValue::text(self.record.class.as_str()),
            FeedField::Status => GridValue::text(self.record.status.get().as_str()),
        }
    }
}
