//! Error taxonomy shared by the client, the operations and the dispatcher.

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::ValidationError;

#[derive(Error, Diagnostic, Debug)]
pub enum TickTickError {
    #[error("Invalid input: {0}")]
    #[diagnostic(code(ticktick::validation))]
    Validation(#[from] ValidationError),

    #[error("TickTick API error ({status}): {message}")]
    #[diagnostic(code(ticktick::api))]
    Api {
        status: u16,
        message: String,
        /// Remote error payload, when the body was JSON.
        body: Option<serde_json::Value>,
    },

    #[error("Failed to reach TickTick API")]
    #[diagnostic(
        code(ticktick::transport),
        help("Check network connectivity and the configured API URL.")
    )]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from TickTick API: {message}")]
    #[diagnostic(code(ticktick::invalid_response))]
    InvalidResponse { message: String },

    #[error("Invalid API base URL '{url}': {message}")]
    #[diagnostic(
        code(ticktick::invalid_base_url),
        help("Base URLs must be absolute, e.g. https://api.ticktick.com/open/v1")
    )]
    InvalidBaseUrl { url: String, message: String },

    #[error("Unknown tool name: {name}")]
    #[diagnostic(code(ticktick::unknown_tool))]
    UnknownTool { name: String },

    #[error("Arguments are required for tool '{tool}'")]
    #[diagnostic(code(ticktick::missing_arguments))]
    MissingArguments { tool: String },

    #[error("Failed to serialize result: {0}")]
    #[diagnostic(code(ticktick::serialization))]
    Serialization(#[from] serde_json::Error),
}

impl TickTickError {
    /// Whether the failure came from talking to the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(self, TickTickError::Api { .. } | TickTickError::Transport { .. })
    }

    /// Single-line description suitable for surfacing to an agent host.
    ///
    /// Remote failures include their underlying cause, which `Display` alone
    /// leaves in the source chain.
    pub fn describe(&self) -> String {
        match self {
            TickTickError::Transport { source } => {
                let kind = if source.is_timeout() {
                    "request timed out"
                } else if source.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                };
                format!("TickTick API {kind}: {source}")
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for TickTickError {
    fn from(source: reqwest::Error) -> Self {
        TickTickError::Transport { source }
    }
}

pub type TickTickResult<T> = Result<T, TickTickError>;
