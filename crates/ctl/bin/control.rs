use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use xenbuilderctl::cli::BuilderCommand;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let command = BuilderCommand::parse();
    command.run().await
}
