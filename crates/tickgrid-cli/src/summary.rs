use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tickgrid_model::{Correctness, RenderAttr, TextAlign};

use crate::types::{ColumnRow, SessionResult, StepSnapshot};

pub fn print_columns(columns: &[ColumnRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Field"),
        header_cell("Heading"),
        header_cell("Type"),
        header_cell("Align"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for column in columns {
        table.add_row(vec![
            Cell::new(column.index),
            Cell::new(&column.name),
            Cell::new(&column.heading),
            Cell::new(column.kind),
            Cell::new(align_label(column.align)),
        ]);
    }
    println!("{table}");
    println!("{} columns", columns.len());
}

pub fn print_session(result: &SessionResult, each_step: bool) {
    println!("Session: {}", result.symbol);
    for (number, step) in result.steps.iter().enumerate() {
        println!("step {}: {} ({} cells changed)", number + 1, step.label, step.changed);
        if each_step {
            print_step(step);
        }
    }
    if !each_step
        && let Some(last) = result.steps.last()
    {
        print_step(last);
    }
}

fn print_step(step: &StepSnapshot) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Heading"),
        header_cell("Value"),
        header_cell("Quality"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for cell in &step.cells {
        table.add_row(vec![
            Cell::new(cell.index),
            Cell::new(&cell.heading),
            value_cell(&cell.text, &cell.attrs),
            quality_cell(cell.correctness),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn align_label(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

fn value_cell(text: &str, attrs: &[RenderAttr]) -> Cell {
    if text.is_empty() {
        return dim_cell("-");
    }
    let mut cell = Cell::new(text);
    for attr in attrs {
        cell = match attr {
            RenderAttr::ValueIncreased => cell.fg(Color::Green),
            RenderAttr::ValueDecreased => cell.fg(Color::Red),
            RenderAttr::DataSuspect => cell.fg(Color::Yellow),
            RenderAttr::DataError => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        };
    }
    cell
}

fn quality_cell(correctness: Correctness) -> Cell {
    match correctness {
        Correctness::Good => Cell::new("good").fg(Color::Green),
        Correctness::Usable => Cell::new("usable").fg(Color::Green),
        Correctness::Suspect => Cell::new("suspect").fg(Color::Yellow),
        Correctness::Error => Cell::new("error")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
