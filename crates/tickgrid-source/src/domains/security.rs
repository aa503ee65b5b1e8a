//! Listed security quote domain.
//!
//! The widest schema in the set, and the only one whose quality has two
//! inputs: the record's own badness and the badness of the feed that carries
//! it. The worse of the two wins whenever the record is asked for its
//! correctness.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, Multicast, SymbolId, ValueKind};
use tickgrid_schema::{FieldSchema, FieldSpec, HeadingOverrides};

use crate::record_source::{DataRecord, RecordBinding};

pub const SCHEMA_NAME: &str = "Quote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityField {
    Symbol,
    Name,
    Market,
    Last,
    BestBid,
    BestAsk,
    Volume,
    TradeCount,
    Open,
    High,
    Low,
    Close,
    TradingState,
    InAuction,
    QuoteDate,
    Trend,
}

impl SecurityField {
    pub const ALL: [SecurityField; 16] = [
        SecurityField::Symbol,
        SecurityField::Name,
        SecurityField::Market,
        SecurityField::Last,
        SecurityField::BestBid,
        SecurityField::BestAsk,
        SecurityField::Volume,
        SecurityField::TradeCount,
        SecurityField::Open,
        SecurityField::High,
        SecurityField::Low,
        SecurityField::Close,
        SecurityField::TradingState,
        SecurityField::InAuction,
        SecurityField::QuoteDate,
        SecurityField::Trend,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    fn name(self) -> &'static str {
        match self {
            SecurityField::Symbol => "Symbol",
            SecurityField::Name => "Name",
            SecurityField::Market => "Market",
            SecurityField::Last => "Last",
            SecurityField::BestBid => "BestBid",
            SecurityField::BestAsk => "BestAsk",
            SecurityField::Volume => "Volume",
            SecurityField::TradeCount => "TradeCount",
            SecurityField::Open => "Open",
            SecurityField::High => "High",
            SecurityField::Low => "Low",
            SecurityField::Close => "Close",
            SecurityField::TradingState => "TradingState",
            SecurityField::InAuction => "InAuction",
            SecurityField::QuoteDate => "QuoteDate",
            SecurityField::Trend => "Trend",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            SecurityField::Symbol => "Symbol",
            SecurityField::Name => "Name",
            SecurityField::Market => "Market",
            SecurityField::Last => "Last",
            SecurityField::BestBid => "Bid",
            SecurityField::BestAsk => "Ask",
            SecurityField::Volume => "Volume",
            SecurityField::TradeCount => "Trades",
            SecurityField::Open => "Open",
            SecurityField::High => "High",
            SecurityField::Low => "Low",
            SecurityField::Close => "Close",
            SecurityField::TradingState => "State",
            SecurityField::InAuction => "Auction",
            SecurityField::QuoteDate => "Date",
            SecurityField::Trend => "Trend",
        }
    }

    fn kind(self) -> ValueKind {
        match self {
            SecurityField::Symbol => ValueKind::Symbol,
            SecurityField::Name | SecurityField::Market | SecurityField::TradingState => {
                ValueKind::Text
            }
            SecurityField::Last
            | SecurityField::BestBid
            | SecurityField::BestAsk
            | SecurityField::Open
            | SecurityField::High
            | SecurityField::Low
            | SecurityField::Close => ValueKind::Decimal,
            SecurityField::Volume | SecurityField::TradeCount => ValueKind::Integer,
            SecurityField::InAuction => ValueKind::Boolean,
            SecurityField::QuoteDate => ValueKind::Date,
            SecurityField::Trend => ValueKind::IntegerArray,
        }
    }

    fn supported(self) -> bool {
        // Trend history never made it past the legacy renderer.
        !matches!(self, SecurityField::Trend)
    }

    fn spec(self) -> FieldSpec {
        FieldSpec {
            id: self.code(),
            name: self.name(),
            heading: self.heading(),
            kind: self.kind(),
            supported: self.supported(),
        }
    }
}

pub fn security_schema(overrides: &HeadingOverrides) -> FieldSchema {
    FieldSchema::build(SCHEMA_NAME, SecurityField::ALL.iter().map(|field| field.spec()), overrides)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradingState {
    PreOpen,
    Open,
    Auction,
    Halted,
    Closed,
}

impl TradingState {
    pub fn as_str(self) -> &'static str {
        match self {
            TradingState::PreOpen => "Pre-Open",
            TradingState::Open => "Open",
            TradingState::Auction => "Auction",
            TradingState::Halted => "Halted",
            TradingState::Closed => "Closed",
        }
    }
}

impl fmt::Display for TradingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incremental quote update. Price members carry a double option so an
/// update can null a price out (overnight session roll) as well as move it.
#[derive(Debug, Default, Clone)]
pub struct SecurityUpdate {
    pub last: Option<Option<Decimal>>,
    pub best_bid: Option<Option<Decimal>>,
    pub best_ask: Option<Option<Decimal>>,
    pub volume: Option<i64>,
    pub trade_count: Option<i64>,
    pub open: Option<Option<Decimal>>,
    pub high: Option<Option<Decimal>>,
    pub low: Option<Option<Decimal>>,
    pub close: Option<Option<Decimal>>,
    pub trading_state: Option<TradingState>,
    pub in_auction: Option<bool>,
    pub quote_date: Option<NaiveDate>,
}

/// A live quote for one listed security.
pub struct SecurityRecord {
    symbol: SymbolId,
    name: String,
    last: Cell<Option<Decimal>>,
    best_bid: Cell<Option<Decimal>>,
    best_ask: Cell<Option<Decimal>>,
    volume: Cell<i64>,
    trade_count: Cell<i64>,
    open: Cell<Option<Decimal>>,
    high: Cell<Option<Decimal>>,
    low: Cell<Option<Decimal>>,
    close: Cell<Option<Decimal>>,
    trading_state: Cell<TradingState>,
    in_auction: Cell<bool>,
    quote_date: Cell<Option<NaiveDate>>,
    badness: Cell<Badness>,
    feed_badness: Cell<Badness>,
    changed: Multicast<Vec<SecurityField>>,
    correctness_changed: Multicast<()>,
}

impl SecurityRecord {
    pub fn new(symbol: SymbolId, name: impl Into<String>) -> Rc<Self> {
        Rc::new(SecurityRecord {
            symbol,
            name: name.into(),
            last: Cell::new(None),
            best_bid: Cell::new(None),
            best_ask: Cell::new(None),
            volume: Cell::new(0),
            trade_count: Cell::new(0),
            open: Cell::new(None),
            high: Cell::new(None),
            low: Cell::new(None),
            close: Cell::new(None),
            trading_state: Cell::new(TradingState::PreOpen),
            in_auction: Cell::new(false),
            quote_date: Cell::new(None),
            badness: Cell::new(Badness::NotBad),
            feed_badness: Cell::new(Badness::NotBad),
            changed: Multicast::new(),
            correctness_changed: Multicast::new(),
        })
    }

    pub fn symbol(&self) -> &SymbolId {
        &self.symbol
    }

    pub fn last(&self) -> Option<Decimal> {
        self.last.get()
    }

    pub fn volume(&self) -> i64 {
        self.volume.get()
    }

    /// Applies one quote update and publishes the touched fields as a single
    /// event.
    pub fn apply(&self, update: &SecurityUpdate) {
        let mut fields = Vec::new();
        let mut put_price = |cell: &Cell<Option<Decimal>>,
                             next: Option<Option<Decimal>>,
                             field: SecurityField| {
            if let Some(next) = next
                && next != cell.get()
            {
                cell.set(next);
                fields.push(field);
            }
        };
        put_price(&self.last, update.last, SecurityField::Last);
        put_price(&self.best_bid, update.best_bid, SecurityField::BestBid);
        put_price(&self.best_ask, update.best_ask, SecurityField::BestAsk);
        put_price(&self.open, update.open, SecurityField::Open);
        put_price(&self.high, update.high, SecurityField::High);
        put_price(&self.low, update.low, SecurityField::Low);
        put_price(&self.close, update.close, SecurityField::Close);
        if let Some(volume) = update.volume
            && volume != self.volume.get()
        {
            self.volume.set(volume);
            fields.push(SecurityField::Volume);
        }
        if let Some(trade_count) = update.trade_count
            && trade_count != self.trade_count.get()
        {
            self.trade_count.set(trade_count);
            fields.push(SecurityField::TradeCount);
        }
        if let Some(trading_state) = update.trading_state
            && trading_state != self.trading_state.get()
        {
            self.trading_state.set(trading_state);
            fields.push(SecurityField::TradingState);
        }
        if let Some(in_auction) = update.in_auction
            && in_auction != self.in_auction.get()
        {
            self.in_auction.set(in_auction);
            fields.push(SecurityField::InAuction);
        }
        if let Some(quote_date) = update.quote_date
            && Some(quote_date) != self.quote_date.get()
        {
            self.quote_date.set(Some(quote_date));
            fields.push(SecurityField::QuoteDate);
        }
        if !fields.is_empty() {
            self.changed.publish(&fields);
        }
    }

    /// Folds one trade into the quote: last price, running volume and trade
    /// count, and the session high/low water marks.
    pub fn apply_trade(&self, price: Decimal, size: i64) {
        let mut fields = vec![
            SecurityField::Last,
            SecurityField::Volume,
            SecurityField::TradeCount,
        ];
        self.last.set(Some(price));
        self.volume.set(self.volume.get() + size);
        self.trade_count.set(self.trade_count.get() + 1);
        if self.high.get().is_none_or(|high| price > high) {
            self.high.set(Some(price));
            fields.push(SecurityField::High);
        }
        if self.low.get().is_none_or(|low| price < low) {
            self.low.set(Some(price));
            fields.push(SecurityField::Low);
        }
        self.changed.publish(&fields);
    }

    pub fn badness(&self) -> Badness {
        self.badness.get()
    }

    pub fn feed_badness(&self) -> Badness {
        self.feed_badness.get()
    }

    fn merged(own: Badness, feed: Badness) -> Correctness {
        Correctness::merge(own.correctness(), feed.correctness())
    }

    pub fn set_badness(&self, badness: Badness) {
        let before = Self::merged(self.badness.get(), self.feed_badness.get());
        self.badness.set(badness);
        if Self::merged(badness, self.feed_badness.get()) != before {
            self.correctness_changed.publish(&());
        }
    }

    /// Feed trouble degrades every security the feed carries, but only moves
    /// the merged level when it is worse than the record's own state.
    pub fn set_feed_badness(&self, feed_badness: Badness) {
        let before = Self::merged(self.badness.get(), self.feed_badness.get());
        self.feed_badness.set(feed_badness);
        if Self::merged(self.badness.get(), feed_badness) != before {
            self.correctness_changed.publish(&());
        }
    }
}

impl DataRecord for SecurityRecord {
    type Field = SecurityField;

    fn changed(&self) -> &Multicast<Vec<SecurityField>> {
        &self.changed
    }

    fn correctness_changed(&self) -> &Multicast<()> {
        &self.correctness_changed
    }

    fn correctness(&self) -> Correctness {
        Self::merged(self.badness.get(), self.feed_badness.get())
    }

    fn field_code(field: SecurityField) -> u16 {
        field.code()
    }
}

pub struct SecurityBinding {
    record: Rc<SecurityRecord>,
    schema: Rc<FieldSchema>,
}

impl SecurityBinding {
    pub fn new(record: Rc<SecurityRecord>, schema: Rc<FieldSchema>) -> Self {
        SecurityBinding { record, schema }
    }
}

impl RecordBinding for SecurityBinding {
    type Record = SecurityRecord;

    fn record(&self) -> &Rc<SecurityRecord> {
        &self.record
    }

    fn schema(&self) -> &Rc<FieldSchema> {
        &self.schema
    }

    fn build_value(&self, code: u16) -> GridValue {
        let Some(field) = SecurityField::from_code(code) else {
            panic!("Quote schema has no field code {code}");
        };
        match field {
            SecurityField::Symbol => GridValue::symbol(self.record.symbol.clone()),
            SecurityField::Name => GridValue::text(self.record.name.clone()),
            SecurityField::Market => GridValue::text(self.record.symbol.market()),
            SecurityField::Last => GridValue::decimal_opt(self.record.last.get()),
            SecurityField::BestBid => GridValue::decimal_opt(self.record.best_bid.get()),
            SecurityField::BestAsk => GridValue::decimal_opt(self.record.best_ask.get()),
            SecurityField::Volume => GridValue::integer(self.record.volume.get()),
            SecurityField::TradeCount => GridValue::integer(self.record.trade_count.get()),
            SecurityField::Open => GridValue::decimal_opt(self.record.open.get()),
            SecurityField::High => GridValue::decimal_opt(self.record.high.get()),
            SecurityField::Low => GridValue::decimal_opt(self.record.low.get()),
            SecurityField::Close => GridValue::decimal_opt(self.record.close.get()),
            SecurityField::TradingState => {
                GridValue::text(self.record.trading_state.get().as_str())
            }
            SecurityField::InAuction => GridValue::boolean(self.record.in_auction.get()),
            SecurityField::QuoteDate => GridValue::date_opt(self.record.quote_date.get()),
            SecurityField::Trend => ValueKind::IntegerArray.undefined_value(),
        }
    }
}
