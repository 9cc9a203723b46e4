use pricechart_core::PriceSeries;

use crate::cli::FetchArgs;
use crate::error::CliError;

pub fn run(args: &FetchArgs, series: &PriceSeries) -> Result<(), CliError> {
    let json = if args.pretty {
        serde_json::to_string_pretty(series)?
    } else {
        serde_json::to_string(series)?
    };
    println!("{json}");
    Ok(())
}
