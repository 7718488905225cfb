use clap::Parser;
use registry_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Warm(args) => cli::warm::run(args).await,
        Command::Get(args) => cli::get::run(args).await,
    }
}
