use clap::Parser;
use joplin_mcp_config::DEFAULT_ENV_FILE;
use std::path::PathBuf;

/// MCP server for the Joplin Data API over streamable HTTP
#[derive(Debug, Parser)]
#[command(name = "joplin-mcp", version, about)]
pub struct Cli {
    /// Path to a .env file (ignored if missing)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Bind host, overriding MCP_HOST
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overriding MCP_PORT
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default `EnvFilter` directives when `RUST_LOG` is unset
    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        [
            "joplin_mcp",
            "joplin_mcp_server",
            "joplin_mcp_tools",
            "joplin_mcp_client",
            "joplin_mcp_config",
        ]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["joplin-mcp"]);
        assert_eq!(cli.env_file, PathBuf::from(".env"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.log_filter().starts_with("joplin_mcp=info,"));
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "joplin-mcp",
            "--env-file",
            "/etc/joplin.env",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "-v",
        ]);
        assert_eq!(cli.env_file, PathBuf::from("/etc/joplin.env"));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.log_filter().contains("joplin_mcp_tools=debug"));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["joplin-mcp", "--port", "70000"]).is_err());
    }
}
