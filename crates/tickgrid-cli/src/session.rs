//! Deterministic scripted market session over a call/put pair row.
//!
//! The script drives the call leg of one option pair through a subscription
//! handshake, an opening auction, two trades and a feed wobble, mirroring
//! the update traffic a live terminal row sees. The put leg is deliberately
//! absent so the undefined block is visible in the output.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use tickgrid_model::{Badness, GridRow, SymbolId};
use tickgrid_schema::{FieldList, HeadingOverrides};
use tickgrid_source::{
    CallPutRecord, SecurityRecord, SecurityUpdate, TradingState, call_put_row,
};

use crate::types::{CellSnapshot, SessionResult, StepSnapshot};

pub fn run_simulation(symbol: &SymbolId, overrides: &HeadingOverrides) -> Result<SessionResult> {
    let strike = Decimal::new(4250, 2);
    let expiry = NaiveDate::from_ymd_opt(2026, 9, 17).context("script expiry date")?;
    let session_date = NaiveDate::from_ymd_opt(2026, 8, 25).context("script session date")?;

    let call = SecurityRecord::new(
        symbol.clone(),
        format!("{} Sep {strike} Call", symbol.code()),
    );
    call.set_badness(Badness::SubscribeWaiting);
    let pair = CallPutRecord::new(strike, expiry, Some(Rc::clone(&call)), None);
    let row = call_put_row(&pair, overrides);

    let grid = Rc::new(RefCell::new(row.field_list.undefined_row()));
    let changed = Rc::new(Cell::new(0usize));
    let mut guards = Vec::new();
    for source in &row.sources {
        let sink = Rc::clone(&grid);
        let tally = Rc::clone(&changed);
        guards.push(source.subscribe_value_changes(Box::new(move |changes| {
            sink.borrow_mut().apply_changes(changes);
            tally.set(tally.get() + changes.len());
        })));

        let sink = Rc::clone(&grid);
        let tally = Rc::clone(&changed);
        let first_index = source.first_index();
        guards.push(source.subscribe_all_changed(Box::new(move |values| {
            sink.borrow_mut().apply_all(first_index, values);
            tally.set(tally.get() + values.len());
        })));

        guards.push(source.subscribe_first_usable(Box::new(move || {
            debug!(first_index, "source delivered its first usable values");
        })));

        let block = source.activate();
        grid.borrow_mut().apply_all(source.first_index(), &block);
    }

    let mut steps = Vec::new();
    let mut last_total = 0usize;
    take_step("activate", &row.field_list, &grid, &changed, &mut last_total, &mut steps);

    call.set_badness(Badness::NotBad);
    take_step(
        "subscription confirmed",
        &row.field_list,
        &grid,
        &changed,
        &mut last_total,
        &mut steps,
    );

    call.apply(&SecurityUpdate {
        trading_state: Some(TradingState::Open),
        open: Some(Some(Decimal::new(305, 2))),
        last: Some(Some(Decimal::new(305, 2))),
        best_bid: Some(Some(Decimal::new(300, 2))),
        best_ask: Some(Some(Decimal::new(312, 2))),
        volume: Some(12_000),
        trade_count: Some(4),
        quote_date: Some(session_date),
        ..Default::default()
    });
    take_step(
        "opening auction",
        &row.field_list,
        &grid,
        &changed,
        &mut last_total,
        &mut steps,
    );

    call.apply_trade(Decimal::new(310, 2), 500);
    take_step("trade 3.10 x 500", &row.field_list, &grid, &changed, &mut last_total, &mut steps);

    call.apply_trade(Decimal::new(295, 2), 200);
    take_step("trade 2.95 x 200", &row.field_list, &grid, &changed, &mut last_total, &mut steps);

    call.set_feed_badness(Badness::FeedSuspect);
    take_step("feed degraded", &row.field_list, &grid, &changed, &mut last_total, &mut steps);

    call.set_feed_badness(Badness::NotBad);
    take_step("feed recovered", &row.field_list, &grid, &changed, &mut last_total, &mut steps);

    Ok(SessionResult {
        symbol: symbol.clone(),
        steps,
    })
}

fn take_step(
    label: &str,
    field_list: &FieldList,
    grid: &RefCell<GridRow>,
    changed: &Cell<usize>,
    last_total: &mut usize,
    steps: &mut Vec<StepSnapshot>,
) {
    let total = changed.get();
    let delta = total - *last_total;
    *last_total = total;
    info!(step = label, changed = delta, "session step applied");
    steps.push(StepSnapshot {
        label: label.to_owned(),
        changed: delta,
        cells: snapshot_cells(field_list, &mut grid.borrow_mut()),
    });
}

fn snapshot_cells(field_list: &FieldList, grid: &mut GridRow) -> Vec<CellSnapshot> {
    (0..field_list.field_count())
        .map(|index| {
            let rendered = grid.render(index);
            CellSnapshot {
                index,
                heading: field_list.field_heading(index),
                text: rendered.text.clone(),
                attrs: rendered.attrs.clone(),
                correctness: grid.value(index).correctness(),
            }
        })
        .collect()
}
