//! TickTick MCP server binary.
//!
//! Resolves configuration, builds the API client and serves the MCP tools over
//! stdio (default) or Streamable HTTP.

use std::net::IpAddr;

use axum::Router;
use clap::{Parser, ValueEnum};
use miette::Diagnostic;
use rmcp::ServiceExt;
use thiserror::Error;
use ticktick_mcp::TickTickError;
use ticktick_mcp::client::ApiClient;
use ticktick_mcp::config::{Config, ConfigError, Overrides};
use ticktick_mcp::mcp::{TickTickServer, create_mcp_service};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] TickTickError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(ticktick::binary::io))]
    Io(#[from] std::io::Error),

    #[error("MCP server error: {0}")]
    #[diagnostic(code(ticktick::binary::mcp))]
    Mcp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP at /mcp
    Http,
}

#[derive(Parser)]
#[command(name = "ticktick-mcp")]
#[command(author, version, about = "MCP server for the TickTick open API", long_about = None)]
struct Cli {
    /// Transport to serve the MCP protocol on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Host address to bind to (http transport)
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on (http transport)
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// TickTick access token (overrides TICKTICK_ACCESS_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Primary API base URL (overrides TICKTICK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// v2 API base URL used for completed tasks (overrides TICKTICK_API_V2_URL)
    #[arg(long)]
    api_v2_url: Option<String>,
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticktick_mcp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve_stdio(client: ApiClient) -> Result<(), BinaryError> {
    info!("serving MCP over stdio");

    let service = TickTickServer::new(client)
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| BinaryError::Mcp(e.to_string()))?;

    service
        .waiting()
        .await
        .map_err(|e| BinaryError::Mcp(e.to_string()))?;
    Ok(())
}

async fn serve_http(client: ApiClient, host: IpAddr, port: u16) -> Result<(), BinaryError> {
    let ct = CancellationToken::new();
    let app = Router::new()
        .nest_service("/mcp", create_mcp_service(client, ct.child_token()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            ct.cancel();
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| miette::miette!("Failed to install rustls crypto provider"))?;

    let config = Config::resolve(Overrides {
        access_token: cli.token,
        api_url: cli.api_url,
        api_v2_url: cli.api_v2_url,
    })
    .map_err(BinaryError::from)?;
    info!(api_url = %config.api_url, api_v2_url = %config.api_v2_url, "configuration resolved");

    let client = ApiClient::new(&config).map_err(BinaryError::from)?;

    match cli.transport {
        Transport::Stdio => serve_stdio(client).await?,
        Transport::Http => serve_http(client, cli.host, cli.port).await?,
    }

    Ok(())
}
