use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde_json::json;
use tracing::info;

use tickgrid_schema::{FieldList, HeadingOverrides};
use tickgrid_source::{schema_for, standard_field_list};

use crate::cli::{ColumnsArgs, HeadingsAction, HeadingsArgs, SimulateArgs};
use crate::session::run_simulation;
use crate::summary::{apply_table_style, print_columns};
use crate::types::{ColumnRow, SessionResult};

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let overrides = load_overrides(args.headings.as_deref())?;
    let field_list = match args.domain {
        Some(kind) => {
            let mut list = FieldList::new();
            list.add_schema(Rc::new(schema_for(kind, &overrides)), "");
            list
        }
        None => standard_field_list(&overrides),
    };
    let columns = collect_columns(&field_list);
    if args.json {
        let rows: Vec<_> = columns
            .iter()
            .map(|column| {
                json!({
                    "index": column.index,
                    "name": column.name,
                    "heading": column.heading,
                    "kind": column.kind,
                    "align": column.align,
                })
            })
            .collect();
        let document = serde_json::to_string_pretty(&rows).context("serialize columns")?;
        println!("{document}");
    } else {
        print_columns(&columns);
    }
    Ok(())
}

pub fn run_headings(args: &HeadingsArgs) -> Result<()> {
    let path = &args.file;
    let mut overrides = HeadingOverrides::load(path)
        .with_context(|| format!("load headings from {}", path.display()))?;
    match &args.action {
        HeadingsAction::Show => {
            if overrides.is_empty() {
                println!("no heading overrides in {}", path.display());
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec!["Schema", "Field", "Heading"]);
            apply_table_style(&mut table);
            for (schema, field, heading) in overrides.entries() {
                table.add_row(vec![schema, field, heading]);
            }
            println!("{table}");
        }
        HeadingsAction::Set {
            schema,
            field,
            heading,
        } => {
            overrides.set(schema, field, heading);
            overrides
                .save(path)
                .with_context(|| format!("save headings to {}", path.display()))?;
            info!(schema = %schema, field = %field, heading = %heading, "heading override saved");
            println!("{schema},{field} -> {heading}");
        }
        HeadingsAction::Remove { schema, field } => match overrides.remove(schema, field) {
            Some(previous) => {
                overrides
                    .save(path)
                    .with_context(|| format!("save headings to {}", path.display()))?;
                println!("removed {schema},{field} (was {previous})");
            }
            None => println!("no override for {schema},{field}"),
        },
    }
    Ok(())
}

pub fn run_simulate(args: &SimulateArgs) -> Result<SessionResult> {
    let overrides = load_overrides(args.headings.as_deref())?;
    run_simulation(&args.symbol, &overrides)
}

fn load_overrides(path: Option<&Path>) -> Result<HeadingOverrides> {
    match path {
        Some(path) => HeadingOverrides::load(path)
            .with_context(|| format!("load headings from {}", path.display())),
        None => Ok(HeadingOverrides::new()),
    }
}

fn collect_columns(field_list: &FieldList) -> Vec<ColumnRow> {
    field_list
        .grid_fields()
        .into_iter()
        .map(|field| ColumnRow {
            index: field.index(),
            name: field.name().to_owned(),
            heading: field.heading().to_owned(),
            kind: field.kind(),
            align: field.kind().default_align(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_columns_spans_the_standard_list() {
        let field_list = standard_field_list(&HeadingOverrides::new());
        let columns = collect_columns(&field_list);
        assert_eq!(columns.len(), field_list.field_count());
        assert_eq!(columns[0].index, 0);
        assert_eq!(columns[0].name, "Account,AccountId");
        let last = columns.last().unwrap();
        assert_eq!(last.index, field_list.field_count() - 1);
    }

    #[test]
    fn test_headings_set_then_remove_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("headings.json");

        run_headings(&HeadingsArgs {
            file: file.clone(),
            action: HeadingsAction::Set {
                schema: "Quote".to_owned(),
                field: "Last".to_owned(),
                heading: "Px".to_owned(),
            },
        })
        .unwrap();
        let overrides = HeadingOverrides::load(&file).unwrap();
        assert_eq!(overrides.get("Quote", "Last"), Some("Px"));

        run_headings(&HeadingsArgs {
            file: file.clone(),
            action: HeadingsAction::Remove {
                schema: "Quote".to_owned(),
                field: "Last".to_owned(),
            },
        })
        .unwrap();
        let overrides = HeadingOverrides::load(&file).unwrap();
        assert!(overrides.is_empty());
    }
}
