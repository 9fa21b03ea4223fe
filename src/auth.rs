//! Token resolution and the command kwargs bag.
//!
//! A token comes from the `-t/--token` flag, then `ST2_AUTH_TOKEN`, then
//! an explicitly loaded config file. Missing everywhere is not an error;
//! requests simply go out without `X-Auth-Token`.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ClientConfig;

/// Key under which the resolved token is placed in a [`Kwargs`] bag.
pub const TOKEN_KEY: &str = "token";

/// An opaque authentication token.
///
/// `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw value. Empty strings are not tokens.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Parsed arguments that may carry a `token` value.
pub trait TokenSource {
    fn token(&self) -> Option<&str>;
}

impl TokenSource for Option<String> {
    fn token(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Resolve the token for one invocation.
pub fn resolve_token<A>(args: &A, config: &ClientConfig) -> Option<AuthToken>
where
    A: TokenSource + ?Sized,
{
    args.token()
        .and_then(AuthToken::new)
        .or_else(|| config.env_token.as_deref().and_then(AuthToken::new))
        .or_else(|| config.file_token().and_then(AuthToken::new))
}

/// Named parameters handed to a command handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kwargs(BTreeMap<String, String>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The token placed by [`add_auth_token_to_kwargs`], if any.
    pub fn token(&self) -> Option<AuthToken> {
        self.get(TOKEN_KEY).and_then(AuthToken::new)
    }
}

impl<K, V> FromIterator<(K, V)> for Kwargs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Return a copy of `kwargs` with `token` set when one resolves.
///
/// When nothing resolves the copy is identical to the input: no `token`
/// key and no placeholder.
pub fn add_auth_token_to_kwargs<A>(args: &A, config: &ClientConfig, kwargs: &Kwargs) -> Kwargs
where
    A: TokenSource + ?Sized,
{
    let mut decorated = kwargs.clone();
    if let Some(token) = resolve_token(args, config) {
        decorated.insert(TOKEN_KEY, token.as_str());
    }
    decorated
}
