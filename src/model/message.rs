use super::{Extensions, ExternalDocumentation, MessageBindings, RefOr, Reference, Schema, Tag};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
}

/// Message description. `payload` is an arbitrary JSON Schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<RefOr<CorrelationId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<MessageBindings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<RefOr<MessageTrait>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Schema>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Reusable partial message, merged into messages that list it in `traits`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTrait {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<RefOr<CorrelationId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<MessageBindings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
}

/// The `message` field of an operation: one reference, a `oneOf` union of
/// references, or an inline message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageRef {
    Single(Reference),
    OneOf {
        #[serde(rename = "oneOf")]
        one_of: Vec<Reference>,
    },
    Inline(Box<Message>),
}

impl MessageRef {
    /// A single reference for one entry, a `oneOf` for more. `None` when empty.
    pub fn from_references(mut references: Vec<Reference>) -> Option<Self> {
        match references.len() {
            0 => None,
            1 => references.pop().map(MessageRef::Single),
            _ => Some(MessageRef::OneOf {
                one_of: references,
            }),
        }
    }

    /// All references held by this value, in order
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            MessageRef::Single(reference) => vec![reference],
            MessageRef::OneOf { one_of } => one_of.iter().collect(),
            MessageRef::Inline(_) => Vec::new(),
        }
    }
}
