//! Working-order domain.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, Multicast, SymbolId, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Order";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    OrderId,
    Account,
    Symbol,
    Side,
    Status,
    LimitPrice,
    Quantity,
    FilledQuantity,
    FillSizes,
    Created,
}

impl OrderField {
    pub const ALL: [OrderField; 10] = [
        OrderField::OrderId,
        OrderField::Account,
        OrderField::Symbol,
        OrderField::Side,
        OrderField::Status,
        OrderField::LimitPrice,
        OrderField::Quantity,
        OrderField::FilledQuantity,
        OrderField::FillSizes,
        OrderField::Created,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            OrderField::OrderId => "OrderId",
            OrderField::Account => "Account",
            OrderField::Symbol => "Symbol",
            OrderField::Side => "Side",
            OrderField::Status => "Status",
            OrderField::LimitPrice => "LimitPrice",
            OrderField::Quantity => "Quantity",
            OrderField::FilledQuantity => "FilledQuantity",
            OrderField::FillSizes => "FillSizes",
            OrderField::Created => "Created",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            OrderField::OrderId => "Order",
            OrderField::Account => "Account",
            OrderField::Symbol => "Symbol",
            OrderField::Side => "Side",
            OrderField::Status => "Status",
            OrderField::LimitPrice => "Limit",
            OrderField::Quantity => "Qty",
            OrderField::FilledQuantity => "Filled",
            OrderField::FillSizes => "Fills",
            OrderField::Created => "Created",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            OrderField::OrderId | OrderField::Account | OrderField::Side | OrderField::Status => {
                ValueKind::Text
            }
            OrderField::Symbol => ValueKind::Symbol,
            OrderField::LimitPrice => ValueKind::Decimal,
            OrderField::Quantity | OrderField::FilledQuantity => ValueKind::Integer,
            OrderField::FillSizes => ValueKind::IntegerArray,
            OrderField::Created => ValueKind::DateTime,
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

pub fn order_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, OrderField::ALL.iter().map(|field| field.spec()), overrides)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Open => "Open",
            OrderStatus::PartiallyFilled => "Partially Filled",
            OrderStatus::Filled => "Filled",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incremental order update from the trading server. Unset members leave
/// the corresponding record fields untouched; `limit_price` distinguishes
/// "no change" (`None`) from "now a market order" (`Some(None)`).
#[derive(Debug, Default, Clone)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub limit_price: Option<Option<Decimal>>,
    pub quantity: Option<i64>,
    pub fill: Option<i64>,
}

/// A working order.
pub struct OrderRecord {
    order_id: String,
    account: String,
    symbol: SymbolId,
    side: OrderSide,
    status: Cell<OrderStatus>,
    limit_price: Cell<Option<Decimal>>,
    quantity: Cell<i64>,
    filled_quantity: Cell<i64>,
    fill_sizes: RefCell<Vec<i64>>,
    created: DateTime<Utc>,
    badness: Cell<Badness>,
    changed: Multicast<Vec<OrderField>>,
    correctness_changed: Multicast<()>,
}

impl OrderRecord {
    pub fn new(
        order_id: impl Into<String>,
        account: impl Into<String>,
        symbol: SymbolId,
        side: OrderSide,
        limit_price: Option<Decimal>,
        quantity: i64,
        created: DateTime<Utc>,
    ) -> Rc<Self> {
        Rc::new(OrderRecord {
            order_id: order_id.into(),
            account: account.into(),
            symbol,
            side,
            status: Cell::new(OrderStatus::Pending),
            limit_price: Cell::new(limit_price),
            quantity: Cell::new(quantity),
            filled_quantity: Cell::new(0),
            fill_sizes: RefCell::new(Vec::new()),
            created,
            badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status.get()
    }

    pub fn filled_quantity(&self) -> i64 {
        self.filled_quantity.get()
    }

    /// Applies one server update and publishes every field it touched as a
    /// single event. A fill extends the fill history as well as the total.
    pub fn apply(&self, update: &OrderUpdate) {
        let mut fields = Vec::new();
        if let Some(status) = update.status
            && status != self.status.get()
        {
            self.status.set(status);
            fields.push(OrderField::Status);
        }
        if let Some(limit_price) = update.limit_price
            && limit_price != self.limit_price.get()
        {
            self.limit_price.set(limit_price);
            fields.push(OrderField::LimitPrice);
        }
        if let Some(quantity) = update.quantity
            && quantity != self.quantity.get()
        {
            self.quantity.set(quantity);
            fields.push(OrderField::Quantity);
        }
        if let Some(size) = update.fill {
            self.filled_quantity.set(self.filled_quantity.get() + size);
            self.fill_sizes.borrow_mut().push(size);
            fields.push(OrderField::FilledQuantity);
            fields.push(OrderField::FillSizes);
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

impl DataRecord for OrderRecord {
    type Field = OrderField;

    fn changed(&self) -> &Multicast<Vec<OrderField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        self.badness.get().correctness()
    }

    fn field_code(field: OrderField) -> u16 {
        field.code()
    }
}

pub struct OrderBinding {
    record: Rc<OrderRecord>,
    schema: Rc<FieldSchema>,
}

impl OrderBinding {
    pub fn new(record: Rc<OrderRecord>, schema: Rc<FieldSchema>) -> Self {
        OrderBinding { record, schema }
    }
}

impl RecordBinding for OrderBinding {
    type Record = OrderRecord;

    fn record(&self) -> &Rc<OrderRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = OrderField::from_code(code) else {
            panic!("Order schema has no field code {code}");
        };
        match field {
            OrderField::OrderId => GridValue::text(self.record.order_id.clone()),
            OrderField::Account => GridValue::text(self.record.account.clone()),
            OrderField::Symbol => GridValue::symbol(self.record.symbol.clone()),
            OrderField::Side => GridValue::text(self.record.side.as_str()),
            OrderField::Status => GridValue::text(self.record.status.get().as_str()),
            OrderField::LimitPrice => GridValue::decimal_opt(self.record.limit_price.get()),
            OrderField::Quantity => GridValue::integer(self.record.quantity.get()),
            OrderField::FilledQuantity => GridValue::integer(self.record.filled_quantity.get()),
            OrderField::FillSizes => {
                GridValue::integer_array(self.record.fill_sizes.borrow().clone())
            }
            OrderField::Created => GridValue::date_time(self.record.created),
        }
    }
}
