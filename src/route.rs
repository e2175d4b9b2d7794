//! Route descriptors handed over by the host framework.
//!
//! An adapter over the framework's routing table produces a stable snapshot
//! of [`RouteDescriptor`]s. The descriptors deserialize from the route
//! manifest format used by the command-line tool, so the same shapes serve
//! both in-process adapters and manifest files.

use crate::message_extractor::PayloadType;
use crate::model::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trait for producing route descriptors from a host application.
///
/// Implementations must return a stable snapshot: the route table is not
/// expected to change while a document is being built.
pub trait RouteSource {
    fn routes(&self) -> Vec<RouteDescriptor>;
}

impl RouteSource for [RouteDescriptor] {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.to_vec()
    }
}

impl RouteSource for Vec<RouteDescriptor> {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.clone()
    }
}

/// A single registered route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteDescriptor {
    Http(HttpRoute),
    #[serde(alias = "ws")]
    WebSocket(WebSocketRoute),
    /// Mounts, static files and anything else the generator does not document
    Other { path: String },
}

impl RouteDescriptor {
    pub fn path(&self) -> &str {
        match self {
            RouteDescriptor::Http(route) => &route.path,
            RouteDescriptor::WebSocket(route) => &route.path,
            RouteDescriptor::Other { path } => path,
        }
    }
}

impl From<HttpRoute> for RouteDescriptor {
    fn from(route: HttpRoute) -> Self {
        RouteDescriptor::Http(route)
    }
}

impl From<WebSocketRoute> for RouteDescriptor {
    fn from(route: WebSocketRoute) -> Self {
        RouteDescriptor::WebSocket(route)
    }
}

fn default_true() -> bool {
    true
}

/// Plain request/response endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRoute {
    pub path: String,
    /// Name of the handler function
    pub name: String,
    pub methods: BTreeSet<HttpMethod>,
    /// Explicit operation identifier, used verbatim when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default = "default_true")]
    pub include_in_schema: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl HttpRoute {
    pub fn new(path: impl Into<String>, name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            methods: BTreeSet::from([method]),
            unique_id: None,
            include_in_schema: true,
            description: None,
            tags: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.methods.insert(method);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn excluded(mut self) -> Self {
        self.include_in_schema = false;
        self
    }
}

/// Bidirectional WebSocket endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketRoute {
    pub path: String,
    /// Name of the handler function
    pub name: String,
    /// Documentation string of the handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
}

impl WebSocketRoute {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Client to server message the handler expects
    pub fn subscribes(self, name: impl Into<String>, payload: PayloadType) -> Self {
        self.with_parameter(ParameterDescriptor::new(name, ParameterRole::Subscribe, Some(payload)))
    }

    /// Server to client message the handler emits
    pub fn publishes(self, name: impl Into<String>, payload: PayloadType) -> Self {
        self.with_parameter(ParameterDescriptor::new(name, ParameterRole::Publish, Some(payload)))
    }
}

/// Role a handler parameter plays in the message exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterRole {
    #[default]
    None,
    Subscribe,
    Publish,
}

/// A declared handler parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub role: ParameterRole,
    /// Declared payload type; `None` when the adapter could not resolve it
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadType>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, role: ParameterRole, payload: Option<PayloadType>) -> Self {
        Self {
            name: name.into(),
            role,
            payload,
        }
    }
}
