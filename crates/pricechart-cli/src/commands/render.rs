use std::path::Path;

use pricechart_core::{DashboardConfig, PriceSeries};
use pricechart_web::Dashboard;
use tracing::info;

use crate::cli::RenderArgs;
use crate::error::CliError;

pub fn run(
    args: &RenderArgs,
    config: &DashboardConfig,
    series: &PriceSeries,
) -> Result<(), CliError> {
    write_page(&args.output, config, series)?;
    info!(path = %args.output.display(), "dashboard written");
    println!("{}", args.output.display());
    Ok(())
}

pub fn write_page(
    path: &Path,
    config: &DashboardConfig,
    series: &PriceSeries,
) -> Result<(), CliError> {
    let html = Dashboard::from_series(config, series).render_html();
    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pricechart_core::{PriceSource, TradingDay, YahooAdapter};

    use super::*;

    #[tokio::test]
    async fn writes_self_contained_page() {
        let config = DashboardConfig {
            start_date: TradingDay::parse("2020-01-01").expect("start"),
            end_date: TradingDay::parse("2020-02-01").expect("end"),
            ..DashboardConfig::default()
        };
        let series = YahooAdapter::default()
            .history(config.request().expect("request"))
            .await
            .expect("series");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dashboard.html");
        write_page(&path, &config, &series).expect("write");

        let html = std::fs::read_to_string(&path).expect("read");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Simple Stock Price App</h1>"));
        assert!(html.contains("<h2>Close</h2>"));
        assert!(html.contains("<h2>Volume</h2>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("dashboard.html");
        let config = DashboardConfig::default();
        let series = PriceSeries::new(
            config.symbol().expect("symbol"),
            config.interval,
            config.range().expect("range"),
            Vec::new(),
        );

        let error = write_page(&path, &config, &series).expect_err("no parent dir");
        assert_eq!(error.exit_code(), 10);
    }
}
