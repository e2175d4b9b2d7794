//! Protocol bindings. Only the `http` and `ws` bindings are modeled, any
//! other protocol key is kept verbatim in the extension bag.

use super::{Extensions, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binding version emitted when the caller does not pin one
pub const DEFAULT_BINDING_VERSION: &str = "latest";

/// HTTP request methods, declared in lexicographic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpBindingType {
    Request,
    Response,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpOperationBinding {
    #[serde(rename = "type")]
    pub binding_type: HttpBindingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_version: Option<String>,
}

impl HttpOperationBinding {
    pub fn request(method: HttpMethod) -> Self {
        Self {
            binding_type: HttpBindingType::Request,
            method: Some(method),
            query: None,
            binding_version: Some(DEFAULT_BINDING_VERSION.to_string()),
        }
    }
}

/// Methods allowed for the WebSocket handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WsMethod {
    #[default]
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsBinding {
    #[serde(default)]
    pub method: WsMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_version: Option<String>,
}

impl Default for WsBinding {
    fn default() -> Self {
        Self {
            method: WsMethod::Get,
            query: None,
            headers: None,
            binding_version: Some(DEFAULT_BINDING_VERSION.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpOperationBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws: Option<WsBinding>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws: Option<WsBinding>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMessageBinding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpMessageBinding>,
    #[serde(flatten)]
    pub extensions: Extensions,
}
