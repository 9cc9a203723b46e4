//! Price source trait and request/error types.
//!
//! [`PriceSource`] is the fetch contract consumed by the dashboard:
//! `history(ticker, start, end) -> PriceSeries`. Adapters implement it on top
//! of an [`HttpClient`](crate::http_client::HttpClient).
//!
//! ```rust,ignore
//! use pricechart_core::{DateRange, HistoryRequest, PriceSource, Symbol, TradingDay, YahooAdapter};
//!
//! async fn closes(adapter: &YahooAdapter) -> Result<(), Box<dyn std::error::Error>> {
//!     let range = DateRange::new(TradingDay::parse("2010-05-31")?, TradingDay::parse("2020-05-31")?)?;
//!     let series = adapter.history(HistoryRequest::new(Symbol::parse("NFLX")?, range)).await?;
//!     println!("{} rows", series.len());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DateRange, Interval, PriceSeries, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    UnknownSymbol,
    Unavailable,
    RateLimited,
    Internal,
}

/// Structured source error propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unknown_symbol(symbol: &Symbol, detail: impl Display) -> Self {
        Self {
            kind: SourceErrorKind::UnknownSymbol,
            message: format!("symbol '{symbol}' not found upstream: {detail}"),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::UnknownSymbol => "source.unknown_symbol",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for a price-history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: DateRange,
    pub interval: Interval,
    /// Scale OHLC by the adjusted-close ratio.
    pub auto_adjust: bool,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self {
            symbol,
            range,
            interval: Interval::OneDay,
            auto_adjust: true,
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_auto_adjust(mut self, auto_adjust: bool) -> Self {
        self.auto_adjust = auto_adjust;
        self
    }
}

/// Price history provider contract.
///
/// Implementations must be `Send + Sync`; the series they return is owned by
/// the caller.
pub trait PriceSource: Send + Sync {
    /// Fetches the price table for `req.symbol` over `req.range`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The symbol is unknown upstream ([`SourceErrorKind::UnknownSymbol`])
    /// - The provider is unreachable or rate limited
    /// - The response cannot be parsed
    ///
    /// An empty range is not an error: it yields an empty series.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDay;

    #[test]
    fn history_request_defaults_to_adjusted_daily_bars() {
        let range = DateRange::new(
            TradingDay::parse("2010-05-31").expect("valid"),
            TradingDay::parse("2020-05-31").expect("valid"),
        )
        .expect("valid range");
        let request = HistoryRequest::new(Symbol::parse("NTFL").expect("valid"), range);

        assert_eq!(request.interval, Interval::OneDay);
        assert!(request.auto_adjust);
        assert!(!request.with_auto_adjust(false).auto_adjust);
    }

    #[test]
    fn error_codes_are_stable() {
        let symbol = Symbol::parse("NTFL").expect("valid");
        let err = SourceError::unknown_symbol(&symbol, "No data found");
        assert_eq!(err.code(), "source.unknown_symbol");
        assert!(!err.retryable());
        assert!(err.to_string().contains("NTFL"));
        assert!(SourceError::unavailable("down").retryable());
    }
}
