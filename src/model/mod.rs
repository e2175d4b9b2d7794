//! Typed representation of an AsyncAPI 2.x document.
//!
//! Every object of the document is a plain serde struct. Optional fields are
//! skipped when absent so that the serialized output mirrors exactly which
//! fields were supplied. Objects that the AsyncAPI specification allows to be
//! extended carry an [`Extensions`] bag which is flattened back into the
//! object on serialization.
//!
//! The only behavior attached to the model is structural validation, see
//! [`AsyncApi::validate`].

pub mod bindings;
pub mod channel;
pub mod components;
pub mod info;
pub mod message;
pub mod security;
pub mod server;

pub use bindings::{
    ChannelBindings, HttpBindingType, HttpMessageBinding, HttpMethod, HttpOperationBinding,
    MessageBindings, OperationBindings, WsBinding, WsMethod, DEFAULT_BINDING_VERSION,
};
pub use channel::{ChannelItem, Operation, OperationTrait, Parameter};
pub use components::Components;
pub use info::{Contact, ExternalDocumentation, Info, License, Tag};
pub use message::{CorrelationId, Message, MessageRef, MessageTrait};
pub use security::{ApiKeyLocation, OAuthFlow, OAuthFlows, SecurityScheme, SecuritySchemeType};
pub use server::{Protocol, SecurityRequirement, Server, ServerVariable};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Arbitrary JSON Schema document
pub type Schema = Value;

/// Unrecognized keys kept for forward compatibility with newer drafts
pub type Extensions = BTreeMap<String, Value>;

/// AsyncAPI specification versions this crate can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AsyncApiVersion {
    #[serde(rename = "2.0.0")]
    V2_0_0,
    #[serde(rename = "2.1.0")]
    V2_1_0,
    #[serde(rename = "2.2.0")]
    V2_2_0,
    #[serde(rename = "2.3.0")]
    V2_3_0,
    #[serde(rename = "2.4.0")]
    #[default]
    V2_4_0,
}

impl AsyncApiVersion {
    pub const ALL: [AsyncApiVersion; 5] = [
        AsyncApiVersion::V2_0_0,
        AsyncApiVersion::V2_1_0,
        AsyncApiVersion::V2_2_0,
        AsyncApiVersion::V2_3_0,
        AsyncApiVersion::V2_4_0,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AsyncApiVersion::V2_0_0 => "2.0.0",
            AsyncApiVersion::V2_1_0 => "2.1.0",
            AsyncApiVersion::V2_2_0 => "2.2.0",
            AsyncApiVersion::V2_3_0 => "2.3.0",
            AsyncApiVersion::V2_4_0 => "2.4.0",
        }
    }
}

impl fmt::Display for AsyncApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AsyncApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AsyncApiVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnsupportedVersion(s.to_string()))
    }
}

/// A `$ref` pointer to a reusable definition under `components`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Reference to `#/components/<kind>/<name>`
    pub fn component(kind: &str, name: &str) -> Self {
        Self::new(format!("#/components/{}/{}", kind, name))
    }

    /// Name of the referenced entry when the pointer targets `#/components/<kind>/`
    pub fn component_name(&self, kind: &str) -> Option<&str> {
        self.reference
            .strip_prefix("#/components/")
            .and_then(|rest| rest.strip_prefix(kind))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }
}

/// Either an inline object or a reference to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        RefOr::Item(item)
    }
}

/// Root AsyncAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncApi {
    pub asyncapi: AsyncApiVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<BTreeMap<String, Server>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_content_type: Option<String>,
    pub channels: BTreeMap<String, ChannelItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl AsyncApi {
    /// Runs the structural checks that must hold for a document to be returned
    pub fn validate(&self) -> Result<()> {
        crate::security::validate_security(self)
    }

    /// Parses and validates a document held as a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(version) = value.get("asyncapi").and_then(Value::as_str) {
            version.parse::<AsyncApiVersion>()?;
        }
        let document: AsyncApi =
            serde_json::from_value(value).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        Self::from_value(value)
    }

    /// The document as a JSON value, with every absent field omitted
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn security_schemes(&self) -> Option<&BTreeMap<String, RefOr<SecurityScheme>>> {
        self.components
            .as_ref()
            .and_then(|c| c.security_schemes.as_ref())
    }
}
