use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use loadspy::config::{self, load_config, load_config_from_path};
use loadspy::logging;
use loadspy::session::Controller;
use loadspy::system::SysinfoSource;

#[derive(Parser)]
#[command(
    name = "loadspy",
    about = "Show the busiest tasks by CPU load until <return> is pressed"
)]
struct Cli {
    /// Sampling interval in seconds (zero or negative means 5)
    #[arg(allow_negative_numbers = true)]
    seconds: Option<i64>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init(&config.logging)?;

    let seconds = cli.seconds.unwrap_or(config.general.interval_secs);
    let mut controller = Controller::new(
        SysinfoSource::new(),
        std::io::stdout(),
        config.general.sampler_options(),
    );
    controller.start(seconds, tokio::io::stdin()).await
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
}
