use super::{
    ChannelBindings, Extensions, ExternalDocumentation, MessageRef, OperationBindings, RefOr,
    Schema, Tag,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reusable partial operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTrait {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<OperationBindings>,
}

/// A subscribe or publish operation on a channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<OperationBindings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<RefOr<OperationTrait>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRef>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Channel parameter (a templated segment of the channel path)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Operations available on a single channel path.
///
/// A meaningful channel has at least one of `subscribe`, `publish` or `$ref`,
/// but an empty item is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, RefOr<Parameter>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<ChannelBindings>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ChannelItem {
    pub fn is_meaningful(&self) -> bool {
        self.subscribe.is_some() || self.publish.is_some() || self.reference.is_some()
    }
}
