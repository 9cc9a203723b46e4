//! CLI argument definitions for pricechart.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `render` | Write the dashboard page to an HTML file (default) |
//! | `serve` | Serve the dashboard over HTTP |
//! | `fetch` | Print the fetched price series as JSON |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--ticker` | `NTFL` | Symbol to chart |
//! | `--start` | `2010-05-31` | First day, inclusive |
//! | `--end` | `2020-05-31` | Last day, exclusive |
//! | `--interval` | `1d` | Bar interval |
//! | `--no-adjust` | `false` | Keep raw prices |
//! | `--mock` | `false` | Use the offline generator |
//!
//! # Examples
//!
//! ```bash
//! pricechart
//! pricechart --ticker NFLX render --output netflix.html
//! pricechart --ticker NFLX serve --addr 0.0.0.0:8501
//! pricechart --mock fetch --pretty
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pricechart_core::config::{DEFAULT_DESCRIPTION, DEFAULT_TICKER, DEFAULT_TITLE};
use pricechart_core::{DashboardConfig, Interval, TradingDay, ValidationError};

/// Stock closing price and volume dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "pricechart",
    author,
    version,
    about = "Chart a ticker's closing price and volume from Yahoo Finance"
)]
pub struct Cli {
    /// Ticker symbol (e.g. NFLX, ^GSPC, BRK-B).
    #[arg(long, global = true, default_value = DEFAULT_TICKER)]
    pub ticker: String,

    /// First trading day, inclusive (YYYY-MM-DD).
    #[arg(long, global = true, default_value = "2010-05-31")]
    pub start: String,

    /// End date, exclusive (YYYY-MM-DD).
    #[arg(long, global = true, default_value = "2020-05-31")]
    pub end: String,

    /// Bar interval: 1d, 5d, 1wk, 1mo or 3mo.
    #[arg(long, global = true, default_value = "1d")]
    pub interval: String,

    /// Report raw prices instead of split/dividend adjusted ones.
    #[arg(long, global = true, default_value_t = false)]
    pub no_adjust: bool,

    /// Page title.
    #[arg(long, global = true, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Text shown under the title.
    #[arg(long, global = true, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Generate deterministic data offline instead of calling Yahoo.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn config(&self) -> Result<DashboardConfig, ValidationError> {
        Ok(DashboardConfig {
            ticker: self.ticker.clone(),
            start_date: TradingDay::parse(&self.start)?,
            end_date: TradingDay::parse(&self.end)?,
            interval: self.interval.parse::<Interval>()?,
            auto_adjust: !self.no_adjust,
            title: self.title.clone(),
            description: self.description.clone(),
        })
    }

    /// The requested command, `render` when none was given.
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Render(RenderArgs::default()))
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Fetch the series and write the dashboard to an HTML file.
    ///
    ///   pricechart render --output dashboard.html
    Render(RenderArgs),

    /// Fetch the series and serve the dashboard over HTTP.
    ///
    ///   pricechart serve --addr 127.0.0.1:8501
    Serve(ServeArgs),

    /// Fetch the series and print it as JSON.
    ///
    ///   pricechart fetch --pretty
    Fetch(FetchArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RenderArgs {
    /// Destination HTML file.
    #[arg(long, short, default_value = "dashboard.html")]
    pub output: PathBuf,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dashboard.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ServeArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8501")]
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FetchArgs {
    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}
