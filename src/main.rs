use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = networth::api::Cli::parse();
    if let Err(e) = networth::api::run_cli(cli).await {
        tracing::error!(error = %e, "networth failed");
        std::process::exit(1);
    }
}
