//! HTTP client for the resource API.
//!
//! Every call passes its [`RequestArgs`] through a fixed injector pipeline
//! before it reaches the [`Transport`]:
//!
//! | Verb          | Pipeline                           |
//! |---------------|------------------------------------|
//! | GET, DELETE   | auth token                         |
//! | POST, PUT     | auth token, then json content type |

pub mod inject;
pub mod transport;

pub use inject::{BasicAuth, Headers, Injector, RequestArgs};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use reqwest::Method;

use crate::error::ClientError;
use inject::{BODYLESS_INJECTORS, BODY_INJECTORS};

pub struct HttpClient<T> {
    root: String,
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(root: impl Into<String>, transport: T) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, path: &str, args: RequestArgs) -> Result<HttpResponse, ClientError> {
        self.dispatch(Method::GET, path, None, BODYLESS_INJECTORS, args)
    }

    pub fn post(
        &self,
        path: &str,
        body: String,
        args: RequestArgs,
    ) -> Result<HttpResponse, ClientError> {
        self.dispatch(Method::POST, path, Some(body), BODY_INJECTORS, args)
    }

    pub fn put(
        &self,
        path: &str,
        body: String,
        args: RequestArgs,
    ) -> Result<HttpResponse, ClientError> {
        self.dispatch(Method::PUT, path, Some(body), BODY_INJECTORS, args)
    }

    pub fn delete(&self, path: &str, args: RequestArgs) -> Result<HttpResponse, ClientError> {
        self.dispatch(Method::DELETE, path, None, BODYLESS_INJECTORS, args)
    }

    fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        injectors: &[Injector],
        args: RequestArgs,
    ) -> Result<HttpResponse, ClientError> {
        let url = format!("{}{}", self.root, path);
        let has_token = args.token.is_some();
        let args = inject::apply(injectors, args);

        tracing::debug!(
            method = %method,
            url = %url,
            has_token,
            basic_auth = args.auth.is_some(),
            "sending request"
        );

        let request = HttpRequest {
            method: method.clone(),
            url: url.clone(),
            body,
            headers: args.headers,
            auth: args.auth,
        };
        let resp = self.transport.send(request)?;
        tracing::debug!(status = resp.status, url = %url, "received response");

        if !resp.is_success() {
            return Err(ClientError::Status {
                method: method.to_string(),
                url,
                status: resp.status,
                body: resp.body,
            });
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthToken;
    use std::cell::RefCell;

    /// Records requests and answers each with a canned response.
    struct Canned {
        status: u16,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16) -> Self {
            Self {
                status,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            self.sent.borrow_mut().push(request);
            Ok(HttpResponse {
                status: self.status,
                body: "[]".into(),
            })
        }
    }

    #[test]
    fn get_without_token_sends_no_headers() {
        let transport = Canned::new(200);
        let client = HttpClient::new("http://localhost:9101/", &transport);
        client.get("/rules", RequestArgs::new()).unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url, "http://localhost:9101/rules");
        assert!(sent[0].headers.is_empty());
    }

    #[test]
    fn post_with_token_sends_both_headers() {
        let transport = Canned::new(201);
        let client = HttpClient::new("http://localhost:9101", &transport);
        let args = RequestArgs::new().with_token(AuthToken::new("abc"));
        client.post("/rules", "{}".into(), args).unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(
            sent[0].headers,
            Headers::from_iter([("X-Auth-Token", "abc"), ("content-type", "application/json")])
        );
        assert_eq!(sent[0].body.as_deref(), Some("{}"));
    }

    #[test]
    fn delete_gets_no_content_type() {
        let transport = Canned::new(204);
        let client = HttpClient::new("http://localhost:9101", &transport);
        client.delete("/rules/1", RequestArgs::new()).unwrap();
        assert!(transport.sent.borrow()[0].headers.is_empty());
    }

    #[test]
    fn non_success_status_is_an_error() {
        let transport = Canned::new(401);
        let client = HttpClient::new("http://localhost:9101", &transport);
        let err = client.get("/rules", RequestArgs::new()).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 401, .. }));
    }
}
