use super::{
    ChannelItem, CorrelationId, Extensions, Message, MessageTrait, OperationBindings,
    OperationTrait, Parameter, RefOr, Schema, SecurityScheme, Server,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reusable objects referenced from the rest of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<BTreeMap<String, RefOr<Server>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<BTreeMap<String, ChannelItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<BTreeMap<String, RefOr<Message>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<BTreeMap<String, RefOr<SecurityScheme>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, RefOr<Parameter>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_ids: Option<BTreeMap<String, RefOr<CorrelationId>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_traits: Option<BTreeMap<String, RefOr<OperationTrait>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_traits: Option<BTreeMap<String, RefOr<MessageTrait>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_bindings: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_bindings: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_bindings: Option<BTreeMap<String, RefOr<OperationBindings>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_bindings: Option<BTreeMap<String, Value>>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Components {
    /// True when serializing would produce `{}`
    pub fn is_empty(&self) -> bool {
        *self == Components::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_components_are_empty() {
        assert!(Components::default().is_empty());
        assert_eq!(serde_json::to_value(Components::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_messages_serialize_under_messages_key() {
        let mut messages = BTreeMap::new();
        messages.insert(
            "Ping".to_string(),
            RefOr::Item(Message {
                payload: Some(json!({"type": "object"})),
                ..Default::default()
            }),
        );
        let components = Components {
            messages: Some(messages),
            ..Default::default()
        };
        assert!(!components.is_empty());
        assert_eq!(
            serde_json::to_value(&components).unwrap(),
            json!({"messages": {"Ping": {"payload": {"type": "object"}}}})
        );
    }
}
