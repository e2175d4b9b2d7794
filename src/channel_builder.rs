//! Route classification and channel building.
//!
//! Each documented route becomes one channel keyed by its path:
//!
//! - HTTP routes get a `subscribe` operation carrying an `http` request
//!   binding for a single representative method.
//! - WebSocket routes get a `subscribe` operation with a `ws` binding, plus
//!   a `publish` operation when the handler declares messages it emits.
//!   Parameters tagged with a [`ParameterRole`] are registered as messages
//!   through the [`MessageRegistry`].
//!
//! A later route with the same path replaces the earlier channel.

use crate::error::Result;
use crate::message_extractor::MessageRegistry;
use crate::model::{
    ChannelItem, HttpMethod, HttpOperationBinding, MessageRef, Operation, OperationBindings,
    Reference, Tag, WsBinding, DEFAULT_BINDING_VERSION,
};
use crate::route::{HttpRoute, ParameterRole, RouteDescriptor, WebSocketRoute};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Options for channel building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOptions {
    /// `bindingVersion` written into every operation binding
    pub binding_version: String,
    /// Content type stamped on registered messages
    pub message_content_type: Option<String>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            binding_version: DEFAULT_BINDING_VERSION.to_string(),
            message_content_type: None,
        }
    }
}

/// Channels and the messages they reference
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    pub channels: BTreeMap<String, ChannelItem>,
    pub registry: MessageRegistry,
}

/// Accumulates channels route by route
pub struct ChannelBuilder {
    options: ChannelOptions,
    channels: BTreeMap<String, ChannelItem>,
    registry: MessageRegistry,
}

impl ChannelBuilder {
    pub fn new(options: ChannelOptions) -> Self {
        debug!("Initializing ChannelBuilder");
        let registry = MessageRegistry::new().with_content_type(options.message_content_type.clone());
        Self {
            options,
            channels: BTreeMap::new(),
            registry,
        }
    }

    /// Adds one route. Routes that are not documented are skipped.
    pub fn add_route(&mut self, route: &RouteDescriptor) -> Result<()> {
        let channel = match route {
            RouteDescriptor::Http(http) if !http.include_in_schema => {
                debug!("Skipping route excluded from schema: {}", http.path);
                return Ok(());
            }
            RouteDescriptor::Http(http) => match self.http_channel(http) {
                Some(channel) => channel,
                None => return Ok(()),
            },
            RouteDescriptor::WebSocket(ws) => self.websocket_channel(ws)?,
            RouteDescriptor::Other { path } => {
                debug!("Ignoring undocumented route kind at {}", path);
                return Ok(());
            }
        };

        let path = route.path().to_string();
        if self.channels.insert(path.clone(), channel).is_some() {
            debug!("Channel {} replaced by a later route", path);
        }
        Ok(())
    }

    pub fn add_routes<'a, I>(&mut self, routes: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a RouteDescriptor>,
    {
        for route in routes {
            self.add_route(route)?;
        }
        Ok(())
    }

    pub fn build(self) -> ChannelSet {
        debug!(
            "Built {} channels referencing {} messages",
            self.channels.len(),
            self.registry.len()
        );
        ChannelSet {
            channels: self.channels,
            registry: self.registry,
        }
    }

    fn http_channel(&self, route: &HttpRoute) -> Option<ChannelItem> {
        let Some(method) = representative_method(route) else {
            warn!("Skipping HTTP route {} without methods", route.path);
            return None;
        };
        debug!("Adding HTTP channel: {} {}", method, route.path);

        let tags = if route.tags.is_empty() {
            None
        } else {
            Some(route.tags.iter().map(Tag::new).collect())
        };

        let mut binding = HttpOperationBinding::request(method);
        binding.binding_version = Some(self.options.binding_version.clone());

        Some(ChannelItem {
            description: Some(route.description.clone().unwrap_or_default()),
            subscribe: Some(Operation {
                operation_id: Some(http_operation_id(route, method)),
                tags,
                bindings: Some(OperationBindings {
                    http: Some(binding),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn websocket_channel(&mut self, route: &WebSocketRoute) -> Result<ChannelItem> {
        debug!("Adding WebSocket channel: {}", route.path);

        let mut subscribed: Vec<Reference> = Vec::new();
        let mut published: Vec<Reference> = Vec::new();
        let mut tagged = 0usize;

        for parameter in &route.parameters {
            let target = match parameter.role {
                ParameterRole::None => continue,
                ParameterRole::Subscribe => &mut subscribed,
                ParameterRole::Publish => &mut published,
            };
            tagged += 1;

            let Some(payload) = parameter.payload.as_ref() else {
                warn!(
                    "Skipping parameter {} of {}: payload type could not be resolved",
                    parameter.name, route.name
                );
                continue;
            };
            let reference = self.registry.register(payload)?;
            if !target.contains(&reference) {
                target.push(reference);
            }
        }

        let subscribe_id = if tagged == 0 {
            route.name.clone()
        } else {
            format!("{}_subscribe", route.name)
        };

        let publish = MessageRef::from_references(published).map(|message| Operation {
            operation_id: Some(format!("{}_publish", route.name)),
            bindings: Some(self.ws_bindings()),
            message: Some(message),
            ..Default::default()
        });

        Ok(ChannelItem {
            description: route.doc.as_deref().map(cleandoc),
            subscribe: Some(Operation {
                operation_id: Some(subscribe_id),
                bindings: Some(self.ws_bindings()),
                message: MessageRef::from_references(subscribed),
                ..Default::default()
            }),
            publish,
            ..Default::default()
        })
    }

    fn ws_bindings(&self) -> OperationBindings {
        OperationBindings {
            ws: Some(WsBinding {
                binding_version: Some(self.options.binding_version.clone()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Builds the channels for `routes` in order
pub fn build_channels(routes: &[RouteDescriptor], options: ChannelOptions) -> Result<ChannelSet> {
    let mut builder = ChannelBuilder::new(options);
    builder.add_routes(routes)?;
    Ok(builder.build())
}

/// Lexicographically smallest declared method.
// Routes registered for several methods are documented under one of them only.
fn representative_method(route: &HttpRoute) -> Option<HttpMethod> {
    route.methods.iter().copied().min_by_key(HttpMethod::as_str)
}

/// Explicit unique id, or `<name><path>_<method>` with non-word characters
/// replaced by `_`
fn http_operation_id(route: &HttpRoute, method: HttpMethod) -> String {
    if let Some(unique_id) = &route.unique_id {
        return unique_id.clone();
    }
    let base: String = format!("{}{}", route.name, route.path)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}_{}", base, method.as_str().to_lowercase())
}

/// Normalizes a handler doc string: trims blank lines at both ends and
/// removes the indentation common to every line after the first.
fn cleandoc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim_start()
            } else {
                line.get(margin..).unwrap_or_else(|| line.trim_start())
            }
        })
        .map(str::trim_end)
        .collect();

    while cleaned.first().is_some_and(|line| line.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}
