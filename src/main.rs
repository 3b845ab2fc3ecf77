use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tavily_mcp::config::{load_config, Config};
use tavily_mcp::mcp::{Dispatcher, McpServer, ToolRegistry};
use tavily_mcp::provider::TavilyProvider;
use tavily_mcp::utils::HttpClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tavily MCP - Web search, extraction, mapping and crawling tools for MCP clients
#[derive(Parser, Debug)]
#[command(name = "tavily-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expose Tavily search, extract, map and crawl as MCP tools over SSE or stdio", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Provider request timeout in seconds (overrides TAVILY_MCP_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Transport used to serve MCP clients
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    /// HTTP listener with server-sent events
    Sse,
    /// Standard input/output of this process
    Stdio,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default: SSE on 0.0.0.0:8000)
    Serve {
        /// Transport to serve on
        #[arg(long, short, value_enum, default_value_t = Transport::Sse)]
        transport: Transport,

        /// Host to bind to for SSE mode (overrides TAVILY_MCP_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port for SSE mode (overrides TAVILY_MCP_PORT)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Shorthand for `serve --transport stdio`
    Stdio,

    /// Shorthand for `serve --transport sse`
    Sse {
        /// Host to bind to (overrides TAVILY_MCP_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides TAVILY_MCP_PORT)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// List the tools this server exposes
    #[command(alias = "ls")]
    Tools {
        /// Print full tool definitions with input schemas as JSON
        #[arg(long, short)]
        json: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Tavily MCP - Environment Variables");
    println!();
    println!("Required:");
    println!("  TAVILY_API_KEY                    Tavily API key");
    println!();
    println!("Server:");
    println!("  TAVILY_MCP_HOST                   Host to bind in SSE mode (default: 0.0.0.0)");
    println!("  TAVILY_MCP_PORT                   Port to bind in SSE mode (default: 8000)");
    println!();
    println!("Provider:");
    println!("  TAVILY_API_BASE_URL               Tavily API base URL (default: https://api.tavily.com)");
    println!("  TAVILY_MCP_TIMEOUT_SECS           Provider request timeout (default: 60)");
    println!("  TAVILY_MCP_CONNECT_TIMEOUT_SECS   Provider connect timeout (default: 10)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                          Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export TAVILY_API_KEY=\"tvly-your-key-here\"");
    println!("  export TAVILY_MCP_PORT=\"8080\"");
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tavily_mcp={}", level)),
    );

    // stdout carries the protocol in stdio mode, so logs always go to stderr
    let json = cli.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// Build the dispatcher and server from resolved configuration
fn build_server(config: &Config) -> Result<McpServer> {
    let http = HttpClient::build(config.request_timeout, config.connect_timeout)
        .context("Failed to create HTTP client")?;
    let provider = TavilyProvider::with_base_url(&config.api_key, &config.api_base_url, http);
    tracing::info!(
        base_url = %config.api_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Tavily provider configured"
    );

    Ok(McpServer::new(Dispatcher::with_provider(Arc::new(provider))))
}

fn print_tools(json: bool) -> Result<()> {
    let registry = ToolRegistry::new();
    if json {
        let tools: Vec<serde_json::Value> = registry
            .list()
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description,
                    "inputSchema": tool.input_schema(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else {
        for tool in registry.list() {
            let required: Vec<&str> = tool.required_params().collect();
            println!("{} (requires: {})", tool.name(), required.join(", "));
            println!("  {}", tool.description);
        }
    }
    Ok(())
}

/// Load configuration, apply CLI overrides and serve until shutdown
async fn serve(
    cli: &Cli,
    transport: Transport,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    // Configuration errors (e.g. missing TAVILY_API_KEY) are fatal
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(secs) = cli.timeout {
        config.set_request_timeout_secs(secs)?;
    }

    let server = build_server(&config)?;

    match transport {
        Transport::Stdio => {
            server.run_stdio().await?;
        }
        Transport::Sse => {
            let addr = config.listen_addr();
            let (bound_addr, handle) = server
                .run_sse(&addr)
                .await
                .with_context(|| format!("Failed to start SSE server on {}", addr))?;
            tracing::info!("MCP server listening on {}", bound_addr);

            tokio::select! {
                joined = handle => {
                    joined.map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received interrupt, shutting down");
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    init_tracing(&cli);

    match &cli.command {
        Some(Commands::Tools { json }) => print_tools(*json),
        Some(Commands::Stdio) => serve(&cli, Transport::Stdio, None, None).await,
        Some(Commands::Sse { host, port }) => {
            serve(&cli, Transport::Sse, host.clone(), *port).await
        }
        Some(Commands::Serve {
            transport,
            host,
            port,
        }) => serve(&cli, *transport, host.clone(), *port).await,
        None => serve(&cli, Transport::Sse, None, None).await,
    }
}
