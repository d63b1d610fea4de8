//! datascience - command-line entry point

use clap::Parser;
use datascience::cli::{cmd_check, cmd_data, cmd_diagnose, cmd_sample, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datascience=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Data => cmd_data(&cli)?,
        Commands::Train => cmd_train(&cli)?,
        Commands::Diagnose => cmd_diagnose(&cli)?,
        Commands::Serve { host, port } => cmd_serve(&cli, host.clone(), *port).await?,
        Commands::Sample { rows } => cmd_sample(&cli, *rows)?,
        Commands::Check => cmd_check(&cli)?,
    }

    Ok(())
}
