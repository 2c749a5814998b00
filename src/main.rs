use clap::Parser;
use weather_windower::cli::{run, Cli};
use weather_windower::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
