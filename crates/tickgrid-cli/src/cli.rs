//! CLI argument definitions for the tick grid tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tickgrid_model::SymbolId;
use tickgrid_source::DomainKind;

#[derive(Parser)]
#[command(
    name = "tickgrid",
    version,
    about = "Tick grid tools - inspect and exercise the terminal's table binding layer",
    long_about = "Inspect the column schemas behind the terminal's data tables and\n\
                  replay a scripted market session through the binding layer.\n\
                  Custom column headings persist between runs in a JSON document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the composed column space for one domain or all of them.
    Columns(ColumnsArgs),

    /// Manage persisted column heading overrides.
    Headings(HeadingsArgs),

    /// Replay a scripted market session through a call/put pair row.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Restrict the listing to one domain (default: every domain).
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domain: Option<DomainKind>,

    /// Heading override document to apply.
    #[arg(long = "headings", value_name = "PATH")]
    pub headings: Option<PathBuf>,

    /// Emit the column list as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct HeadingsArgs {
    /// Heading override document to read and write.
    #[arg(long = "file", value_name = "PATH", default_value = "headings.json", global = true)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: HeadingsAction,
}

#[derive(Subcommand)]
pub enum HeadingsAction {
    /// Show every persisted override.
    Show,

    /// Set the heading for one field.
    Set {
        /// Schema the field belongs to (e.g. Quote).
        schema: String,
        /// Sourceless field name (e.g. Last).
        field: String,
        /// Heading to display.
        heading: String,
    },

    /// Remove the override for one field.
    Remove {
        /// Schema the field belongs to.
        schema: String,
        /// Sourceless field name.
        field: String,
    },
}

#[derive(Parser)]
pub struct SimulateArgs {
    /// Option class symbol driving the session.
    #[arg(long = "symbol", value_name = "CODE.MARKET", default_value = "BHPV95.AXO")]
    pub symbol: SymbolId,

    /// Heading override document to apply.
    #[arg(long = "headings", value_name = "PATH")]
    pub headings: Option<PathBuf>,

    /// Print the full row after every step instead of only at the end.
    #[arg(long = "each-step")]
    pub each_step: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
