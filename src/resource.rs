use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::AuthToken;
use crate::error::ClientError;
use crate::http::{BasicAuth, HttpClient, HttpResponse, RequestArgs, Transport};

/// Remote resource collections the CLI can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Action,
    Rule,
    Trigger,
}

impl ResourceKind {
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Action => "action",
            ResourceKind::Rule => "rule",
            ResourceKind::Trigger => "trigger",
        }
    }

    /// URL path segment of the collection.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Action => "actions",
            ResourceKind::Rule => "rules",
            ResourceKind::Trigger => "triggers",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resource as the API returns it: a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Read a resource definition from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ClientError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(ClientError::InvalidResource {
                path: path.to_path_buf(),
                reason: "expected a JSON object".into(),
            }),
            Err(e) => Err(ClientError::InvalidResource {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// CRUD operations on one resource collection.
pub struct ResourceManager<'a, T> {
    kind: ResourceKind,
    client: &'a HttpClient<T>,
    auth: Option<BasicAuth>,
}

impl<'a, T: Transport> ResourceManager<'a, T> {
    pub fn new(kind: ResourceKind, client: &'a HttpClient<T>) -> Self {
        Self {
            kind,
            client,
            auth: None,
        }
    }

    /// Send basic credentials with every call, alongside any token.
    pub fn with_basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    fn args(&self, token: Option<&AuthToken>) -> RequestArgs {
        RequestArgs::new()
            .with_auth(self.auth.clone())
            .with_token(token.cloned())
    }

    fn collection_path(&self) -> String {
        format!("/{}", self.kind.collection())
    }

    fn item_path(&self, id: &str) -> String {
        format!("/{}/{}", self.kind.collection(), urlencoding::encode(id))
    }

    /// `GET /<collection>`
    pub fn list(&self, token: Option<&AuthToken>) -> Result<Vec<Resource>, ClientError> {
        let path = self.collection_path();
        let resp = self.client.get(&path, self.args(token))?;
        self.parse_list(&path, &resp)
    }

    /// `GET /<collection>/?name=<name>`, first match.
    pub fn get_by_name(
        &self,
        name: &str,
        token: Option<&AuthToken>,
    ) -> Result<Resource, ClientError> {
        let path = format!(
            "/{}/?name={}",
            self.kind.collection(),
            urlencoding::encode(name)
        );
        let resp = self.client.get(&path, self.args(token))?;
        self.parse_list(&path, &resp)?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound {
                kind: self.kind.name(),
                name: name.to_string(),
            })
    }

    /// `POST /<collection>`
    pub fn create(
        &self,
        resource: &Resource,
        token: Option<&AuthToken>,
    ) -> Result<Resource, ClientError> {
        let path = self.collection_path();
        let resp = self.client.post(&path, resource.to_json()?, self.args(token))?;
        self.parse_one(&path, &resp)
    }

    /// Look up `name`, then `PUT /<collection>/<id>` with `resource` under
    /// the looked-up id.
    pub fn update(
        &self,
        name: &str,
        mut resource: Resource,
        token: Option<&AuthToken>,
    ) -> Result<Resource, ClientError> {
        let existing = self.get_by_name(name, token)?;
        let id = self.require_id(&existing)?;
        resource.set("id", Value::String(id.clone()));

        let path = self.item_path(&id);
        let resp = self.client.put(&path, resource.to_json()?, self.args(token))?;
        self.parse_one(&path, &resp)
    }

    /// Look up `name`, then `DELETE /<collection>/<id>`.
    pub fn delete(&self, name: &str, token: Option<&AuthToken>) -> Result<Resource, ClientError> {
        let existing = self.get_by_name(name, token)?;
        let id = self.require_id(&existing)?;
        self.client.delete(&self.item_path(&id), self.args(token))?;
        Ok(existing)
    }

    fn require_id(&self, resource: &Resource) -> Result<String, ClientError> {
        resource
            .id()
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse {
                url: format!("{}{}", self.client.root(), self.collection_path()),
                reason: format!("{} has no id", self.kind),
            })
    }

    fn parse_list(&self, path: &str, resp: &HttpResponse) -> Result<Vec<Resource>, ClientError> {
        match serde_json::from_str::<Value>(&resp.body) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(fields) => Ok(Resource(fields)),
                    _ => Err(self.invalid(path, "expected an array of objects")),
                })
                .collect(),
            Ok(other) => {
                tracing::warn!(
                    url = %format!("{}{}", self.client.root(), path),
                    body = %other,
                    "list response is not an array, treating it as empty"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(self.invalid(path, &e.to_string())),
        }
    }

    fn parse_one(&self, path: &str, resp: &HttpResponse) -> Result<Resource, ClientError> {
        match serde_json::from_str::<Value>(&resp.body) {
            Ok(Value::Object(fields)) => Ok(Resource(fields)),
            Ok(_) => Err(self.invalid(path, "expected an object")),
            Err(e) => Err(self.invalid(path, &e.to_string())),
        }
    }

    fn invalid(&self, path: &str, reason: &str) -> ClientError {
        ClientError::InvalidResponse {
            url: format!("{}{}", self.client.root(), path),
            reason: reason.to_string(),
        }
    }
}
