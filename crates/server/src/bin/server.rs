use clap::Parser;
use server::cli::Cli;
use shared::{configure_tracing, load_dotenv};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing()?;

    let args = Cli::parse();
    debug!(?args);

    server::serve(args).await
}
