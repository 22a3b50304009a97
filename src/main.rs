use carpark::{AppState, CliArgs, GarageConfig, console, init_logging};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    init_logging(cli.log_format)?;

    let config = GarageConfig::load(cli.config.as_deref())?;
    let state = AppState::new(&config)?;

    tracing::info!(
        spots = config.spots.len(),
        default_rate = config.default_rate,
        "garage open"
    );

    console::run(&state)
}
