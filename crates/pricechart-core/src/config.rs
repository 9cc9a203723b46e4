//! Dashboard configuration.
//!
//! Defaults reproduce the single-ticker demo page: ticker `NTFL`, daily bars
//! from 2010-05-31 up to (excluding) 2020-05-31.

use time::macros::date;

use crate::data_source::{HistoryRequest, SourceError};
use crate::{DateRange, Interval, Symbol, TradingDay, ValidationError};

pub const DEFAULT_TICKER: &str = "NTFL";
pub const DEFAULT_TITLE: &str = "Simple Stock Price App";
pub const DEFAULT_DESCRIPTION: &str = "Shown are the stock closing price and volume of Netflix!";

/// Inputs for one dashboard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub ticker: String,
    pub start_date: TradingDay,
    pub end_date: TradingDay,
    pub interval: Interval,
    pub auto_adjust: bool,
    pub title: String,
    pub description: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ticker: String::from(DEFAULT_TICKER),
            start_date: TradingDay::new(date!(2010 - 05 - 31)),
            end_date: TradingDay::new(date!(2020 - 05 - 31)),
            interval: Interval::OneDay,
            auto_adjust: true,
            title: String::from(DEFAULT_TITLE),
            description: String::from(DEFAULT_DESCRIPTION),
        }
    }
}

impl DashboardConfig {
    pub fn symbol(&self) -> Result<Symbol, ValidationError> {
        Symbol::parse(&self.ticker)
    }

    pub fn range(&self) -> Result<DateRange, ValidationError> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn request(&self) -> Result<HistoryRequest, SourceError> {
        let symbol = self
            .symbol()
            .map_err(|e| SourceError::invalid_request(e.to_string()))?;
        let range = self
            .range()
            .map_err(|e| SourceError::invalid_request(e.to_string()))?;

        Ok(HistoryRequest::new(symbol, range)
            .with_interval(self.interval)
            .with_auto_adjust(self.auto_adjust))
    }

    /// Markdown header block shown above the charts.
    pub fn intro_markdown(&self) -> String {
        format!("# {}\n{}", self.title, self.description)
    }
}
