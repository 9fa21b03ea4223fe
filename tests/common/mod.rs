#![allow(dead_code)]

use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{json, Value};
use st2client::config::{ClientConfig, ENV_AUTH_TOKEN, ENV_BASE_URL};
use st2client::http::{HttpRequest, HttpResponse, Transport};
use st2client::ClientError;

pub const API_URL: &str = "http://localhost:9101";

/// Rule fixture shared by the resource tests.
pub fn rule() -> Value {
    json!({
        "id": "6f1d3a9c2b8e4f70a5d1c3e9b7f2a4d6",
        "name": "drule",
        "description": "i am THE rule."
    })
}

/// Environment with only the base URL set.
pub fn base_config() -> ClientConfig {
    ClientConfig::from_vars([(ENV_BASE_URL, "http://localhost")])
}

/// Environment with the base URL and `ST2_AUTH_TOKEN`.
pub fn config_with_env_token(token: &str) -> ClientConfig {
    ClientConfig::from_vars([(ENV_BASE_URL, "http://localhost"), (ENV_AUTH_TOKEN, token)])
}

pub fn random_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Transport that records every request and answers from a route table.
///
/// Unrouted requests get a 404.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<(Method, String, HttpResponse)>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, url: &str, status: u16, body: &Value) -> Self {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.routes
            .lock()
            .push((method, url.to_string(), HttpResponse { status, body }));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().clone()
    }

    /// Requests sent with `method`, in order.
    pub fn sent_with(&self, method: Method) -> Vec<HttpRequest> {
        self.sent
            .lock()
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    pub fn last(&self, method: Method) -> HttpRequest {
        self.sent_with(method.clone())
            .pop()
            .unwrap_or_else(|| panic!("no {method} request was sent"))
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let reply = self
            .routes
            .lock()
            .iter()
            .find(|(m, u, _)| *m == request.method && *u == request.url)
            .map(|(_, _, r)| r.clone())
            .unwrap_or(HttpResponse {
                status: 404,
                body: String::new(),
            });
        self.sent.lock().push(request);
        Ok(reply)
    }
}
