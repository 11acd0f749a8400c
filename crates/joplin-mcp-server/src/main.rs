use anyhow::{Context, Result};
use clap::Parser;
use joplin_mcp_config::Settings;
use joplin_mcp_server::cli::Cli;
use joplin_mcp_server::start_server;
use joplin_mcp_tools::AppContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::load(Some(cli.env_file.as_path()))
        .context("Failed to load configuration")?
        .with_bind_overrides(cli.host.clone(), cli.port);

    tracing::info!(
        joplin = %settings.joplin_base_url,
        bind = %settings.bind_address(),
        "Starting joplin-mcp v{}",
        env!("CARGO_PKG_VERSION")
    );

    let context = AppContext::from_settings(settings).context("Failed to create Joplin client")?;

    start_server(context).await.context("MCP server failed")?;

    Ok(())
}
