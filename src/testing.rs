//! In-process fake TickTick API for tests.
//!
//! Binds an axum router on an ephemeral port, records every request and
//! replays canned responses keyed by method and path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::client::ApiClient;
use crate::config::Config;

pub const API_PREFIX: &str = "/open/v1";
pub const API_V2_PREFIX: &str = "/api/v2";
pub const TOKEN: &str = "test-token";

/// Install the rustls crypto provider once per process.
pub fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Query parameters, already percent-decoded.
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query.get(name).cloned()
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Option<String>,
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<(String, String), Canned>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeApi {
    base: String,
    state: Shared,
}

impl FakeApi {
    pub async fn start() -> Self {
        init_crypto();

        let state: Shared = Arc::default();
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> Config {
        Config::new(
            TOKEN,
            &format!("{}{API_PREFIX}", self.base),
            &format!("{}{API_V2_PREFIX}", self.base),
        )
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("fake API base is a valid URL")
    }

    /// Reply to `method path` (path relative to the primary base) with JSON.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.insert(method, format!("{API_PREFIX}{path}"), status, Some(body.to_string()));
    }

    /// Reply to `method path` with an empty body.
    pub fn respond_empty(&self, method: &str, path: &str, status: u16) {
        self.insert(method, format!("{API_PREFIX}{path}"), status, None);
    }

    /// Reply to `method path` (relative to the v2 base) with JSON.
    pub fn respond_v2(&self, method: &str, path: &str, status: u16, body: Value) {
        self.insert(method, format!("{API_V2_PREFIX}{path}"), status, Some(body.to_string()));
    }

    /// Reply with a raw, possibly non-JSON body.
    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.insert(method, format!("{API_PREFIX}{path}"), status, Some(body.to_string()));
    }

    fn insert(&self, method: &str, full_path: String, status: u16, body: Option<String>) {
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap(),
            body,
        };
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_uppercase(), full_path), canned);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The only recorded request; panics if there is not exactly one.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

async fn handle(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };

    let canned = {
        let mut state = state.lock().unwrap();
        let key = (recorded.method.clone(), recorded.path.clone());
        state.requests.push(recorded);
        state.routes.get(&key).cloned()
    };

    match canned {
        Some(Canned { status, body: Some(body) }) => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Some(Canned { status, body: None }) => status.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "errorCode": "not_found", "errorMessage": "no canned response" }).to_string(),
        )
            .into_response(),
    }
}

/// A minimal task body as the remote service returns it.
pub fn task_json(id: &str, project_id: &str, status: i64) -> Value {
    json!({
        "id": id,
        "projectId": project_id,
        "title": format!("Task {id}"),
        "status": status,
    })
}
