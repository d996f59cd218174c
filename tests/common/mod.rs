#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use notiboost_http::{ClientOptions, NotiBoostClient};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
pub enum MockBody {
    Json(JsonValue),
    Raw(&'static str),
}

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: MockBody,
    headers: Vec<(&'static str, &'static str)>,
    delay: Duration,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body: MockBody::Json(body),
            headers: Vec::new(),
            delay: Duration::from_millis(0),
        }
    }

    pub fn raw(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body: MockBody::Raw(body),
            headers: Vec::new(),
            delay: Duration::from_millis(0),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the mock server saw for one incoming request.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn api_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            method,
            uri,
            headers,
            body,
        });

    let mock = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }

    let mut response = match mock.body {
        MockBody::Json(body) => (mock.status, Json(body)).into_response(),
        MockBody::Raw(text) => (mock.status, text).into_response(),
    };
    for (name, value) in mock.headers {
        response
            .headers_mut()
            .insert(name, HeaderValue::from_static(value));
    }
    response
}

pub struct TestServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("server must have received a request")
    }

    /// Client pointed at this server with fast retries.
    pub fn client(&self, max_retries: usize) -> NotiBoostClient {
        self.client_with(
            ClientOptions::default()
                .with_timeout(1_000)
                .with_max_retries(max_retries)
                .with_retry_backoff(1),
        )
    }

    pub fn client_with(&self, options: ClientOptions) -> NotiBoostClient {
        NotiBoostClient::with_options("test-key", options.with_base_url(self.base_url.clone()))
            .expect("test client must build")
    }
}

pub async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .fallback(api_handler)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        requests: state.requests,
        task,
    }
}
