use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{TickTickError, TickTickResult};

/// Authenticated client for the TickTick REST API.
///
/// Performs exactly one request per call. No retries, no backoff, and no
/// timeout beyond the transport default; retry policy belongs to the caller.
#[derive(Clone)]
pub struct ApiClient {
    api_url: Url,
    api_v2_url: Url,
    access_token: String,
    client: Client,
}

impl ApiClient {
    /// Fails when either base URL cannot carry path segments.
    pub fn new(config: &Config) -> TickTickResult<Self> {
        Ok(Self {
            api_url: parse_base(&config.api_url)?,
            api_v2_url: parse_base(&config.api_v2_url)?,
            access_token: config.access_token.clone(),
            client: Client::new(),
        })
    }

    /// Primary API base URL
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Secondary v2 base URL
    pub fn api_v2_url(&self) -> &Url {
        &self.api_v2_url
    }

    /// Create a GET request builder against the primary base
    pub fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::GET, &self.api_url, segments)
    }

    /// Create a POST request builder against the primary base
    pub fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::POST, &self.api_url, segments)
    }

    /// Create a DELETE request builder against the primary base
    pub fn delete(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::DELETE, &self.api_url, segments)
    }

    /// Create a GET request builder against the v2 base
    pub fn get_v2(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::GET, &self.api_v2_url, segments)
    }

    fn request(&self, method: Method, base: &Url, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, endpoint(base, segments))
            .bearer_auth(&self.access_token)
    }

    /// Send a request and return its JSON body, `None` when the body is empty.
    pub async fn send(&self, builder: RequestBuilder) -> TickTickResult<Option<Value>> {
        let request = builder.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.client.execute(request).await?;
        Self::handle_response(response).await
    }

    /// Send a request whose success response must carry a JSON body.
    pub async fn send_json(&self, builder: RequestBuilder) -> TickTickResult<Value> {
        self.send(builder)
            .await?
            .ok_or_else(|| TickTickError::InvalidResponse {
                message: "expected a JSON body, received an empty response".to_string(),
            })
    }

    /// Handle API response with standardized error handling
    ///
    /// Success statuses yield the parsed body (or `None` when empty). Any
    /// other status becomes `TickTickError::Api` carrying the remote message.
    pub async fn handle_response(response: Response) -> TickTickResult<Option<Value>> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(None);
            }
            return serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| TickTickError::InvalidResponse {
                    message: e.to_string(),
                });
        }

        let body: Option<Value> = serde_json::from_str(&text).ok();
        let message = remote_message(status, body.as_ref(), &text);
        warn!(status = status.as_u16(), %message, "TickTick API returned an error");

        Err(TickTickError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }
}

fn parse_base(raw: &str) -> TickTickResult<Url> {
    let url = Url::parse(raw).map_err(|e| TickTickError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(TickTickError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "URL cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

/// Append `segments` to `base`, percent-encoding each one. Identifiers can
/// never introduce extra path levels or a query string. An empty final
/// segment yields a trailing slash.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // `parse_base` rejects cannot-be-a-base URLs, so this always succeeds.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Pick the most useful message out of a remote error payload.
fn remote_message(status: StatusCode, body: Option<&Value>, text: &str) -> String {
    let from_body = body.and_then(|b| {
        ["errorMessage", "message", "error"]
            .iter()
            .find_map(|key| b.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });

    from_body
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}
