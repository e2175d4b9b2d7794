//! Message extraction from declared payload types.
//!
//! A [`PayloadType`] carries what the schema-declaration side knows about a
//! type: its canonical name, documentation and JSON Schema. The
//! [`MessageRegistry`] turns payload types into `components.messages`
//! entries, deduplicated by name, and hands back `$ref`s to them.
//!
//! Nested definitions found in a payload schema (`definitions` or `$defs`)
//! are hoisted into `components.schemas` and every internal `$ref` is
//! rewritten to point there, so the emitted references resolve against the
//! document root.

use crate::error::{Error, Result};
use crate::model::{Message, Reference, Schema};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const DEFINITION_KEYS: [&str; 2] = ["definitions", "$defs"];
const DEFINITION_PREFIXES: [&str; 2] = ["#/definitions/", "#/$defs/"];

/// A declared message payload type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadType {
    /// Canonical name, unique within one build
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: Schema,
}

impl PayloadType {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Payload type of a Rust type deriving [`JsonSchema`]. The doc comment
    /// of the type becomes the description.
    pub fn of<T: JsonSchema>() -> Self {
        let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
        let description = schema
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            name: T::schema_name(),
            description,
            schema,
        }
    }
}

/// Messages and hoisted schemas collected during one build
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    messages: BTreeMap<String, Message>,
    schemas: BTreeMap<String, Schema>,
    declared: BTreeMap<String, PayloadType>,
    content_type: Option<String>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type stamped on every registered message
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Registers `payload` and returns a reference to its message.
    ///
    /// Registering the same type twice is a no-op. A different type under a
    /// name already in use fails with [`Error::DuplicateMessageNameConflict`].
    pub fn register(&mut self, payload: &PayloadType) -> Result<Reference> {
        let reference = Reference::component("messages", &payload.name);

        if let Some(existing) = self.declared.get(&payload.name) {
            if existing != payload {
                return Err(Error::DuplicateMessageNameConflict {
                    name: payload.name.clone(),
                });
            }
            debug!("Message {} already registered", payload.name);
            return Ok(reference);
        }

        let (body, definitions) = hoist_definitions(&payload.schema);
        for (name, schema) in &definitions {
            if matches!(self.schemas.get(name), Some(existing) if existing != schema) {
                return Err(Error::DuplicateSchemaNameConflict { name: name.clone() });
            }
        }

        debug!(
            "Registering message {} ({} nested schemas)",
            payload.name,
            definitions.len()
        );
        self.schemas.extend(definitions);
        self.messages.insert(
            payload.name.clone(),
            Message {
                description: payload.description.clone(),
                content_type: self.content_type.clone(),
                payload: Some(body),
                ..Default::default()
            },
        );
        self.declared.insert(payload.name.clone(), payload.clone());
        Ok(reference)
    }

    pub fn messages(&self) -> &BTreeMap<String, Message> {
        &self.messages
    }

    pub fn schemas(&self) -> &BTreeMap<String, Schema> {
        &self.schemas
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Consumes the registry, returning `(messages, schemas)`
    pub fn into_parts(self) -> (BTreeMap<String, Message>, BTreeMap<String, Schema>) {
        (self.messages, self.schemas)
    }
}

/// Splits nested definitions out of `schema` and rewrites references to them
fn hoist_definitions(schema: &Schema) -> (Schema, BTreeMap<String, Schema>) {
    let mut body = schema.clone();
    let mut definitions = BTreeMap::new();

    if let Some(object) = body.as_object_mut() {
        object.remove("$schema");
        for key in DEFINITION_KEYS {
            if let Some(Value::Object(defs)) = object.remove(key) {
                definitions.extend(defs);
            }
        }
    }

    rewrite_refs(&mut body);
    for definition in definitions.values_mut() {
        rewrite_refs(definition);
    }
    (body, definitions)
}

fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get_mut("$ref") {
                if let Some(name) = DEFINITION_PREFIXES
                    .iter()
                    .find_map(|prefix| target.strip_prefix(prefix))
                {
                    *target = Reference::component("schemas", name).reference;
                }
            }
            for child in map.values_mut() {
                rewrite_refs(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
        _ => {}
    }
}
