//! Ride demand - main entry point

use clap::Parser;
use ride_demand::cli::{cmd_predict, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_demand=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train(args) => cmd_train(&args),
        Commands::Predict(args) => cmd_predict(&args),
        Commands::Serve { model_dir, host, port } => cmd_serve(model_dir, &host, port).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}
