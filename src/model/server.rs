use super::Extensions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Maps exactly one security scheme name to the scopes it requires
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Transport protocols a server may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    Amqp,
    Amqps,
    Http,
    Https,
    Jms,
    Kafka,
    KafkaSecure,
    Mqtt,
    SecureMqtt,
    Stomp,
    Stomps,
    Ws,
    Wss,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

/// A message broker or endpoint the application talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub url: String,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, ServerVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BTreeMap<String, Value>>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Server {
    pub fn new(url: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            url: url.into(),
            protocol,
            protocol_version: None,
            description: None,
            variables: None,
            security: None,
            bindings: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds a requirement for `scheme` with the given scopes
    pub fn with_security<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_names() {
        assert_eq!(serde_json::to_value(Protocol::KafkaSecure).unwrap(), json!("kafka-secure"));
        assert_eq!(serde_json::to_value(Protocol::SecureMqtt).unwrap(), json!("secure-mqtt"));
        assert_eq!(serde_json::to_value(Protocol::Wss).unwrap(), json!("wss"));
        assert!(serde_json::from_value::<Protocol>(json!("websocket")).is_err());
    }

    #[test]
    fn test_server_with_security() {
        let server = Server::new("localhost", Protocol::Ws).with_security("oauth2", ["read"]);
        assert_eq!(
            serde_json::to_value(&server).unwrap(),
            json!({
                "url": "localhost",
                "protocol": "ws",
                "security": [{"oauth2": ["read"]}]
            })
        );
    }
}
