//! covenant - contract document parsing and extraction.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use covenant_cli::commands;
use covenant_cli::{create_service, load_config, Cli, Command, Output};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(provider = ?config.llm.provider, "Configuration loaded");

    let require_llm = matches!(cli.command, Command::Extract(_) | Command::Risk(_));
    let service = create_service(config, &cli.root, &cli.tenant, require_llm)?;
    let mut out = Output::new(std::io::stdout().lock(), cli.compact);

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &service, &mut out).await,
        Command::Batch(args) => commands::execute_batch(args, &service, &mut out).await,
        Command::Preview(args) => commands::execute_preview(args, &service, &mut out).await,
        Command::Extract(args) => commands::execute_extract(args, &service, &mut out).await,
        Command::Risk(args) => commands::execute_risk(args, &service, &mut out).await,
        Command::Formats => commands::execute_formats(&service, &mut out),
    }
}
