pub mod domains;
pub mod record_source;
pub mod source;

pub use domains::account::{
    AccountBinding, AccountField, AccountRecord, account_schema,
};
pub use domains::balance::{
    BalanceBinding, BalanceField, BalanceRecord, BalanceUpdate, balance_schema,
};
pub use domains::call_put::{
    CALL_PREFIX, CallPutBinding, CallPutField, CallPutRecord, CallPutRow, PUT_PREFIX,
    call_put_row, call_put_schema,
};
pub use domains::feed::{
    FeedBinding, FeedClass, FeedField, FeedRecord, FeedStatus, feed_schema,
};
pub use domains::holding::{
    HoldingBinding, HoldingField, HoldingRecord, HoldingStyle, HoldingUpdate, holding_schema,
};
pub use domains::order::{
    OrderBinding, OrderField, OrderRecord, OrderSide, OrderStatus, OrderUpdate, order_schema,
};
pub use domains::security::{
    SecurityBinding, SecurityField, SecurityRecord, SecurityUpdate, TradingState, security_schema,
};
pub use domains::shareholder::{
    ShareholderBinding, ShareholderField, ShareholderRecord, shareholder_schema,
};
pub use domains::{DomainKind, schema_for, standard_field_list};
pub use record_source::{DataRecord, RecordBinding, RecordField, RecordSource};
pub use source::{SourceState, UndefinedSource, ValueSource};
