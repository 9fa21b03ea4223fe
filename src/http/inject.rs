use std::collections::BTreeMap;

use crate::auth::AuthToken;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Outgoing header map.
///
/// Names keep the case they were inserted with; lookups ignore case, so a
/// caller's `Content-Type` is recognised by the json injector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace a header, matching existing names case-insensitively.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.0.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.0.insert(name, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// HTTP basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Per-call arguments that travel with a request through the injectors.
///
/// An empty `headers` map means "no headers argument".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestArgs {
    pub headers: Headers,
    pub auth: Option<BasicAuth>,
    /// Consumed by [`add_auth_token_to_headers`]; never reaches the transport.
    pub token: Option<AuthToken>,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: Option<AuthToken>) -> Self {
        self.token = token;
        self
    }

    pub fn with_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Transforms call arguments on their way to the transport.
pub type Injector = fn(RequestArgs) -> RequestArgs;

/// Pipeline for POST and PUT. Applied left to right.
pub const BODY_INJECTORS: &[Injector] = &[add_auth_token_to_headers, add_json_content_type_to_headers];

/// Pipeline for GET and DELETE.
pub const BODYLESS_INJECTORS: &[Injector] = &[add_auth_token_to_headers];

/// Run `args` through each injector in order.
pub fn apply(injectors: &[Injector], args: RequestArgs) -> RequestArgs {
    injectors.iter().fold(args, |args, inject| inject(args))
}

/// Move the token, if any, into an `X-Auth-Token` header.
///
/// Basic credentials are independent of the token and pass through as-is.
pub fn add_auth_token_to_headers(mut args: RequestArgs) -> RequestArgs {
    if let Some(token) = args.token.take() {
        args.headers.insert(AUTH_TOKEN_HEADER, token.as_str());
    }
    args
}

/// Default the content type to JSON.
pub fn add_json_content_type_to_headers(mut args: RequestArgs) -> RequestArgs {
    if !args.headers.contains(CONTENT_TYPE_HEADER) {
        args.headers.insert(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
    }
    args
}
