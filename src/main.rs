use clap::Parser;
use tourstats::cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    Cli::parse().run()
}
