pub mod cell;
pub mod correctness;
pub mod datum;
pub mod field;
pub mod multicast;
pub mod render;
pub mod row;
pub mod value;

pub use cell::{CellData, CellValue};
pub use correctness::{Badness, Correctness};
pub use datum::{Datum, ParseSymbolError, SymbolId, DATE_FORMAT, DATE_TIME_FORMAT};
pub use field::GridField;
pub use multicast::{Multicast, Subscription, SubscriptionId};
pub use render::{ColumnState, RenderAttr, RenderValue, TextAlign};
pub use row::{GridRow, ValueChange};
pub use value::{GridValue, ValueKind};
