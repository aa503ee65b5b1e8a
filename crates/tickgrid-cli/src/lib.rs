//! CLI library components for the tick grid tools.

pub mod logging;
