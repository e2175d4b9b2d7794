//! AsyncAPI from routes - AsyncAPI documentation generated from an application's routes.
//!
//! This library turns the HTTP and WebSocket routes registered in a web
//! application into an AsyncAPI 2.x document, plus a small HTML page that
//! renders it. The document is rebuilt from the live route table, so it never
//! drifts from what the application actually serves.
//!
//! # Architecture
//!
//! 1. [`route`] - Route descriptors supplied by an adapter over the host framework
//! 2. [`message_extractor`] - Payload types to deduplicated `components.messages` entries
//! 3. [`channel_builder`] - Classifies routes and builds one channel per path
//! 4. [`asyncapi_builder`] - Assembles metadata, channels and messages into the document
//! 5. [`security`] - Validates server security requirements against declared schemes
//! 6. [`model`] - The typed AsyncAPI document
//! 7. [`serializer`] / [`viewer`] - JSON/YAML output and the HTML viewer page
//!
//! [`manifest`], [`scanner`] and [`cli`] drive the same pipeline from route
//! manifest files on disk.
//!
//! # Example Usage
//!
//! ```
//! use asyncapi_from_routes::{
//!     asyncapi_builder::AsyncApiBuilder,
//!     message_extractor::PayloadType,
//!     model::HttpMethod,
//!     route::{HttpRoute, RouteDescriptor, WebSocketRoute},
//!     serializer::serialize_json,
//! };
//! use serde_json::json;
//!
//! let routes: Vec<RouteDescriptor> = vec![
//!     HttpRoute::new("/items", "list_items", HttpMethod::Get).into(),
//!     WebSocketRoute::new("/ws", "chat")
//!         .subscribes("incoming", PayloadType::new("ChatLine", json!({"type": "object"})))
//!         .into(),
//! ];
//!
//! let document = AsyncApiBuilder::new("MyAPI", "1.0.0").build(&routes).unwrap();
//! assert_eq!(document.channels.len(), 2);
//!
//! let json = serialize_json(&document).unwrap();
//! assert!(json.contains("#/components/messages/ChatLine"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod asyncapi_builder;
pub mod channel_builder;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod message_extractor;
pub mod model;
pub mod route;
pub mod scanner;
pub mod security;
pub mod serializer;
pub mod viewer;

pub use asyncapi_builder::{get_asyncapi, AsyncApiBuilder};
pub use error::{Error, Result};
pub use model::AsyncApi;
