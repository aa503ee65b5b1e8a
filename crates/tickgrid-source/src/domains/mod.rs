//! Record adapters for each table domain in the terminal.
//!
//! Every domain follows the same recipe: a closed field enum carrying the
//! wire codes, a schema builder, a live record publishing change and
//! correctness events, and a [`RecordBinding`](crate::record_source::RecordBinding)
//! that turns wire codes into typed grid values. The generic
//! [`RecordSource`](crate::record_source::RecordSource) engine does the rest.
//!
//! # Domains
//!
//! | Schema | Fields | Notes |
//! |--------|--------|-------|
//! | Account | 5 | Brokerage accounts |
//! | Balance | 5 | Per-currency account balances |
//! | CallPut | 4 | Option pairs; composes two Quote blocks per row |
//! | Feed | 4 | Market data feed status |
//! | Holding | 6 | Positions per account and security |
//! | Order | 10 | Working orders with fill history |
//! | Quote | 16 | Listed securities; Trend is carried but not displayed |
//! | Shareholder | 4 | Top-shareholder register entries |

pub mod account;
pub mod balance;
pub mod call_put;
pub mod feed;
pub mod holding;
pub mod order;
pub mod security;
pub mod shareholder;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tickgrid_schema::{FieldList, FieldSchema, HeadingOverrides};

/// The closed set of table domains the terminal binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Account,
    Balance,
    CallPut,
    Feed,
    Holding,
    Order,
    Security,
    Shareholder,
}

impl DomainKind {
    pub const ALL: [DomainKind; 8] = [
        DomainKind::Account,
        DomainKind::Balance,
        DomainKind::CallPut,
        DomainKind::Feed,
        DomainKind::Holding,
        DomainKind::Order,
        DomainKind::Security,
        DomainKind::Shareholder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DomainKind::Account => "account",
            DomainKind::Balance => "balance",
            DomainKind::CallPut => "call-put",
            DomainKind::Feed => "feed",
            DomainKind::Holding => "holding",
            DomainKind::Order => "order",
            DomainKind::Security => "security",
            DomainKind::Shareholder => "shareholder",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "account" => Ok(DomainKind::Account),
            "balance" => Ok(DomainKind::Balance),
            "call-put" | "callput" => Ok(DomainKind::CallPut),
            "feed" => Ok(DomainKind::Feed),
            "holding" => Ok(DomainKind::Holding),
            "order" => Ok(DomainKind::Order),
            "security" | "quote" => Ok(DomainKind::Security),
            "shareholder" => Ok(DomainKind::Shareholder),
            other => Err(format!("unknown domain '{other}'")),
        }
    }
}

/// Builds the schema for one domain with any heading overrides applied.
pub fn schema_for(kind: DomainKind, overrides: &HeadingOverrides) -> FieldSchema {
    match kind {
        DomainKind::Account => account::account_schema(overrides),
        DomainKind::Balance => balance::balance_schema(overrides),
        DomainKind::CallPut => call_put::call_put_schema(overrides),
        DomainKind::Feed => feed::feed_schema(overrides),
        DomainKind::Holding => holding::holding_schema(overrides),
        DomainKind::Order => order::order_schema(overrides),
        DomainKind::Security => security::security_schema(overrides),
        DomainKind::Shareholder => shareholder::shareholder_schema(overrides),
    }
}

/// Composes every domain schema into one field list, in [`DomainKind::ALL`]
/// order, with no heading prefixes.
pub fn standard_field_list(overrides: &HeadingOverrides) -> FieldList {
    let mut field_list = FieldList::new();
    for kind in DomainKind::ALL {
        field_list.add_schema(Rc::new(schema_for(kind, overrides)), "");
    }
    field_list
}
