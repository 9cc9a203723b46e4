mod fetch;
mod render;
mod serve;

use pricechart_core::{DashboardConfig, PriceSeries, PriceSource, YahooAdapter};
use tracing::warn;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.config()?;
    let adapter = if cli.mock {
        YahooAdapter::default()
    } else {
        YahooAdapter::with_real_client()
    };

    match cli.selected_command() {
        Command::Render(args) => {
            let series = load_series(&adapter, &config).await?;
            render::run(&args, &config, &series)
        }
        Command::Serve(args) => {
            let series = load_series(&adapter, &config).await?;
            serve::run(&args, &config, &series).await
        }
        Command::Fetch(args) => {
            let series = fetch_series(&adapter, &config).await?;
            fetch::run(&args, &series)
        }
    }
}

/// Fetch the configured series, whatever its length.
pub async fn fetch_series(
    source: &dyn PriceSource,
    config: &DashboardConfig,
) -> Result<PriceSeries, CliError> {
    // Bad input is a validation error, not a source error.
    config.symbol()?;
    config.range()?;

    Ok(source.history(config.request()?).await?)
}

/// Fetch the configured series, rejecting an empty one.
pub async fn load_series(
    source: &dyn PriceSource,
    config: &DashboardConfig,
) -> Result<PriceSeries, CliError> {
    let series = fetch_series(source, config).await?;
    if series.is_empty() {
        warn!(symbol = %series.symbol, range = %series.range, "no rows to chart");
        return Err(CliError::EmptySeries {
            symbol: series.symbol.to_string(),
            range: series.range.to_string(),
        });
    }
    Ok(series)
}
