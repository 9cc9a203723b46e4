//! # pricechart-web
//!
//! Presentation layer for `pricechart`: SVG line charts, the dashboard page,
//! and a small axum server that hands out the pre-rendered page.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chart`] | One column as an inline SVG line chart |
//! | [`page`] | Self-contained HTML page built from charts and intro text |
//! | [`server`] | `GET /`, `GET /api/series`, `GET /health` |
//!
//! ```no_run
//! use pricechart_core::{DashboardConfig, PriceSource, YahooAdapter};
//! use pricechart_web::{serve, DashboardState};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::default();
//! let series = YahooAdapter::default().history(config.request()?).await?;
//! let state = DashboardState::new(&config, &series)?;
//! serve(state, "127.0.0.1:8501".parse()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod error;
pub mod html;
pub mod page;
pub mod server;

pub use chart::{render_line_chart, ChartStyle, LineChart};
pub use error::WebError;
pub use page::Dashboard;
pub use server::{router, serve, DashboardState};
