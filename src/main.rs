use clap::Parser;
use omictl::{cli, logging};

#[tokio::main]
async fn main() -> omictl::Result<()> {
    let args = cli::Args::parse();
    let _guard = logging::init()?;
    cli::run(args).await
}
