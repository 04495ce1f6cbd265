//! Row-to-trade transformation.
//!
//! - [`trades`] - the core transformer (rows → profession documents)
//! - [`pipeline`] - parse → transform → validate orchestration

pub mod pipeline;
pub mod trades;

pub use trades::{transform_rows, DefaultsSource, SeededDefaults, ThreadRngDefaults};
