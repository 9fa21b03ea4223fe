use reqwest::Method;

use super::inject::{BasicAuth, Headers};
use crate::error::ClientError;

/// A fully decorated request, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub headers: Headers,
    pub auth: Option<BasicAuth>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request. Implementations forward `headers` verbatim.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).send(request)
    }
}

/// Blocking reqwest transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut req = self.client.request(request.method, &request.url);
        for (name, value) in request.headers.iter() {
            req = req.header(name, value);
        }
        if let Some(auth) = &request.auth {
            req = req.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}
