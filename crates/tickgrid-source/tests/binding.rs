//! End-to-end binding scenarios: records feeding sources feeding rows.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tickgrid_model::{Badness, Correctness, GridValue, RenderAttr, SymbolId, ValueChange};
use tickgrid_schema::{FieldList, HeadingOverrides};
use tickgrid_source::{
    CallPutRecord, OrderBinding, OrderRecord, OrderSide, OrderUpdate, RecordSource,
    SecurityBinding, SecurityRecord, ShareholderBinding, ShareholderRecord, ValueSource,
    account_schema, call_put_row, order_schema, security_schema, shareholder_schema,
    standard_field_list,
};

fn symbol(code: &str) -> SymbolId {
    SymbolId::new(code, "AXO")
}

fn price(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

fn sample_order() -> Rc<OrderRecord> {
    OrderRecord::new(
        "ORD-1001",
        "ACC-7",
        symbol("BHP"),
        OrderSide::Buy,
        Some(price(4215, 2)),
        1000,
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
    )
}

#[test]
fn test_activation_grades_every_initial_value() {
    let order = sample_order();
    order.set_badness(Badness::Delayed);

    let schema = Rc::new(order_schema(&HeadingOverrides::new()));
    let source = RecordSource::new(OrderBinding::new(order, Rc::clone(&schema)), 0);

    let mut values = source.activate();
    assert_eq!(values.len(), schema.field_count());
    for value in &values {
        assert_eq!(value.correctness(), Correctness::Usable);
    }
    assert_eq!(values[0].render().text, "ORD-1001");
    assert_eq!(values[3].render().text, "Buy");
    assert_eq!(values[5].render().text, "42.15");
    assert_eq!(values[9].render().text, "2026-03-14 09:30:00");
}

#[test]
fn test_deltas_carry_the_assigned_base_offset() {
    let overrides = HeadingOverrides::new();
    let mut field_list = FieldList::new();
    field_list.add_schema(Rc::new(account_schema(&overrides)), "");
    let order_first = field_list.add_schema(Rc::new(order_schema(&overrides)), "");
    assert_eq!(order_first, 5);

    let order = sample_order();
    let source = RecordSource::new(
        OrderBinding::new(Rc::clone(&order), Rc::clone(field_list.schema(1))),
        order_first,
    );
    source.activate();

    let seen: Rc<RefCell<Vec<ValueChange>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _guard = source.subscribe_value_changes(move |changes| {
        sink.borrow_mut().extend_from_slice(changes);
    });

    order.apply(&OrderUpdate {
        fill: Some(200),
        ..Default::default()
    });

    let seen = seen.borrow();
    let indexes: Vec<usize> = seen.iter().map(|change| change.index).collect();
    assert_eq!(indexes, vec![12, 13]);
    assert_eq!(field_list.field_name(12), "Order,FilledQuantity");
    assert_eq!(field_list.field_name(13), "Order,FillSizes");

    let mut filled = seen[0].value.clone();
    assert_eq!(filled.render().text, "200");
}

#[test]
fn test_quote_schema_skips_the_trend_field() {
    let schema = security_schema(&HeadingOverrides::new());
    assert_eq!(schema.field_count(), 15);
    assert!(!schema.is_field_supported(15));
    assert_eq!(schema.local_index_of(15), None);
    assert!(schema.find_field_by_name("Quote,Trend").is_none());
    assert_eq!(schema.find_field_by_name("Quote,QuoteDate"), Some(14));
}

#[test]
fn test_feed_trouble_regrades_the_whole_block() {
    let security = SecurityRecord::new(symbol("RIO"), "Rio Tinto");
    let schema = Rc::new(security_schema(&HeadingOverrides::new()));
    let source = RecordSource::new(
        SecurityBinding::new(Rc::clone(&security), schema),
        0,
    );
    source.activate();

    let blocks: Rc<RefCell<Vec<Vec<GridValue>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&blocks);
    let _guard = source.subscribe_all_changed(move |values| {
        sink.borrow_mut().push(values.to_vec());
    });

    security.set_feed_badness(Badness::FeedError);
    // The record's own trouble is masked while the feed is worse.
    security.set_badness(Badness::SymbolMatchWaiting);
    security.set_feed_badness(Badness::NotBad);

    let blocks = blocks.borrow();
    assert_eq!(blocks.len(), 2);
    for value in &blocks[0] {
        assert_eq!(value.correctness(), Correctness::Error);
        let mut value = value.clone();
        assert!(value.render().has_attr(RenderAttr::DataError));
    }
    for value in &blocks[1] {
        assert_eq!(value.correctness(), Correctness::Suspect);
    }
}

#[test]
fn test_first_usable_waits_for_usable_data() {
    let order = sample_order();
    order.set_badness(Badness::SubscribeWaiting);

    let schema = Rc::new(order_schema(&HeadingOverrides::new()));
    let source = RecordSource::new(OrderBinding::new(Rc::clone(&order), schema), 0);

    let fired = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&fired);
    let _guard = source.subscribe_first_usable(move || *sink.borrow_mut() += 1);

    source.activate();
    assert_eq!(*fired.borrow(), 0, "suspect data is not usable yet");

    order.set_badness(Badness::NotBad);
    assert_eq!(*fired.borrow(), 1);

    order.set_badness(Badness::RequestRejected);
    order.set_badness(Badness::NotBad);
    assert_eq!(*fired.borrow(), 1, "the notification fires exactly once");
}

#[test]
fn test_call_put_row_fills_missing_legs_with_undefined() {
    let call = SecurityRecord::new(symbol("BHPV95"), "BHP Sep 42.50 Call");
    let pair = CallPutRecord::new(
        price(4250, 2),
        NaiveDate::from_ymd_opt(2026, 9, 17).unwrap(),
        Some(Rc::clone(&call)),
        None,
    );

    let row = call_put_row(&pair, &HeadingOverrides::new());
    assert_eq!(row.field_list.field_count(), 4 + 15 + 15);
    assert_eq!(row.field_list.field_heading(4), "Call Symbol");
    assert_eq!(row.field_list.field_heading(19), "Put Symbol");
    assert_eq!(row.field_list.find_field_by_name("Quote,Last"), Some(7));

    let mut grid_row = row.field_list.undefined_row();
    for source in &row.sources {
        let block = source.activate();
        grid_row.apply_all(source.first_index(), &block);
    }

    assert_eq!(grid_row.render(0).text, "42.50");
    assert_eq!(grid_row.render(2).text, "BHPV95.AXO");
    assert!(grid_row.value(3).is_null(), "no put leg listed for the strike");
    assert_eq!(grid_row.render(4).text, "BHPV95.AXO");
    assert!(grid_row.value(19).is_undefined());
    assert_eq!(grid_row.render(19).text, "");
}

#[test]
fn test_underlying_trades_flow_into_the_leg_block() {
    let call = SecurityRecord::new(symbol("BHPV95"), "BHP Sep 42.50 Call");
    let pair = CallPutRecord::new(
        price(4250, 2),
        NaiveDate::from_ymd_opt(2026, 9, 17).unwrap(),
        Some(Rc::clone(&call)),
        None,
    );
    let row = call_put_row(&pair, &HeadingOverrides::new());
    let leg = &row.sources[1];
    leg.activate();

    let seen: Rc<RefCell<Vec<Vec<ValueChange>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _guard = leg.subscribe_value_changes(Box::new(move |changes| {
        sink.borrow_mut().push(changes.to_vec());
    }));

    call.apply_trade(price(310, 2), 500);
    call.apply_trade(price(295, 2), 200);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);

    // Last=3, Volume=6, TradeCount=7, High=9, Low=10, offset by the leg base 4.
    let first: Vec<usize> = seen[0].iter().map(|change| change.index).collect();
    assert_eq!(first, vec![7, 10, 11, 13, 14]);
    let second: Vec<usize> = seen[1].iter().map(|change| change.index).collect();
    assert_eq!(second, vec![7, 10, 11, 14], "a lower print moves low but not high");

    let mut last = seen[1][0].value.clone();
    let rendered = last.render();
    assert_eq!(rendered.text, "2.95");
    assert!(rendered.has_attr(RenderAttr::ValueDecreased));
}

#[test]
fn test_shareholder_register_updates_derive_the_change() {
    let holder = ShareholderRecord::new("Pacific Nominees", "A/C 12", 1000);
    let schema = Rc::new(shareholder_schema(&HeadingOverrides::new()));
    let source = RecordSource::new(ShareholderBinding::new(Rc::clone(&holder), schema), 0);

    let mut values = source.activate();
    assert!(values[3].is_null(), "no change before a second report");
    assert_eq!(values[3].render().text, "");

    holder.report_holding(1250);
    let mut values = source.current_values();
    assert_eq!(values[2].render().text, "1250");
    assert_eq!(values[3].render().text, "250");

    holder.report_holding(900);
    let mut values = source.current_values();
    assert_eq!(values[3].render().text, "-350");
}

#[test]
fn test_standard_field_list_spans_every_domain() {
    let field_list = standard_field_list(&HeadingOverrides::new());
    assert_eq!(field_list.schema_count(), 8);
    assert_eq!(field_list.field_count(), 53);
    assert_eq!(field_list.find_field_by_name("Account,AccountId"), Some(0));
    assert_eq!(field_list.find_field_by_name("Order,OrderId"), Some(24));
    assert_eq!(field_list.find_field_by_name("Quote,Symbol"), Some(34));
    assert_eq!(field_list.locate(52), (7, 3));
}

#[test]
fn test_heading_overrides_compose_with_leg_prefixes() {
    let mut overrides = HeadingOverrides::new();
    overrides.set("Quote", "Last", "Px");

    let pair = CallPutRecord::new(
        price(4250, 2),
        NaiveDate::from_ymd_opt(2026, 9, 17).unwrap(),
        None,
        None,
    );
    let row = call_put_row(&pair, &overrides);
    assert_eq!(row.field_list.field_heading(7), "Call Px");
    assert_eq!(row.field_list.field_heading(22), "Put Px");
    assert_eq!(row.field_list.field_name(7), "Quote,Last");
}
