//! # Domain Models
//!
//! Canonical types for a daily price history.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker |
//! | [`TradingDay`] | Exchange-local calendar day |
//! | [`DateRange`] | Half-open `[start, end)` request window |
//! | [`Interval`] | Bar period (1d, 1wk, ...) |
//! | [`PriceRecord`] | One OHLCV row with dividends and splits |
//! | [`PriceSeries`] | Date-indexed table of records |
//! | [`Column`] | One projected field, ready for charting |
//!
//! Construction validates invariants; a [`PriceSeries`] always has strictly
//! increasing dates inside its range.

mod date;
mod interval;
mod models;
mod symbol;

pub use date::{DateRange, TradingDay};
pub use interval::Interval;
pub use models::{Column, Field, PriceRecord, PriceSeries};
pub use symbol::Symbol;
