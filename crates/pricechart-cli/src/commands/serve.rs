use pricechart_core::{DashboardConfig, PriceSeries};
use pricechart_web::DashboardState;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(
    args: &ServeArgs,
    config: &DashboardConfig,
    series: &PriceSeries,
) -> Result<(), CliError> {
    let state = DashboardState::new(config, series)?;
    pricechart_web::serve(state, args.addr).await?;
    Ok(())
}
