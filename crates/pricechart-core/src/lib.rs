//! # Pricechart Core
//!
//! Domain types and the data-fetch half of the pricechart dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance chart adapter |
//! | [`config`] | Dashboard configuration with demo defaults |
//! | [`data_source`] | `PriceSource` trait, request and error types |
//! | [`domain`] | Symbol, dates, price records and series |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricechart_core::{DashboardConfig, Field, PriceSource, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::default();
//!     let series = YahooAdapter::with_real_client().history(config.request()?).await?;
//!     let close = series.column(Field::Close);
//!     println!("{} closing prices", close.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Flow
//!
//! ```text
//! DashboardConfig ──▶ HistoryRequest ──▶ YahooAdapter ──▶ HttpClient
//!                                             │
//!                                             ▼
//!                                        PriceSeries ──▶ Column (Close, Volume)
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;

pub use adapters::{YahooAdapter, YahooAuthManager};

pub use config::DashboardConfig;

pub use data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};

pub use domain::{Column, DateRange, Field, Interval, PriceRecord, PriceSeries, Symbol, TradingDay};

pub use error::ValidationError;

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
