//! MCP Streamable HTTP service creation
//!
//! Builds the service that the binary nests into an Axum router at `/mcp`.

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;

use super::server::TickTickServer;

/// Create MCP Streamable HTTP service
///
/// Each session gets its own [`TickTickServer`] sharing a clone of `client`.
/// Cancelling `cancellation_token` closes open sessions.
///
/// # Example
/// ```no_run
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// use ticktick_mcp::{client::ApiClient, config::Config, mcp::create_mcp_service};
///
/// # fn main() -> ticktick_mcp::TickTickResult<()> {
/// let config = Config::new("token", "https://api.ticktick.com/open/v1", "https://api.ticktick.com/api/v2");
/// let service = create_mcp_service(ApiClient::new(&config)?, CancellationToken::new());
/// let app: Router = Router::new().nest_service("/mcp", service);
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service(
    client: ApiClient,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<TickTickServer, LocalSessionManager> {
    // Returns io::Error to match rmcp's factory signature
    let service_factory =
        move || -> Result<TickTickServer, std::io::Error> { Ok(TickTickServer::new(client.clone())) };

    let config = StreamableHttpServerConfig::default()
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
