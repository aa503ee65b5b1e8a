#![deny(unsafe_code)]

pub mod error;
pub mod field_list;
pub mod headings;
pub mod naming;
pub mod schema;

pub use crate::error::{Result, SchemaError};
pub use crate::field_list::FieldList;
pub use crate::headings::HeadingOverrides;
pub use crate::naming::{qualified_name, split_qualified};
pub use crate::schema::{FieldInfo, FieldSchema, FieldSpec};
