use asyncapi_from_routes::{
    asyncapi_builder::{get_asyncapi, AsyncApiBuilder},
    error::Error,
    manifest::RouteManifest,
    message_extractor::PayloadType,
    model::{AsyncApi, HttpMethod},
    route::{HttpRoute, RouteDescriptor, WebSocketRoute},
    serializer::serialize_json,
};
use pretty_assertions::assert_eq;
use schemars::JsonSchema;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::Path;

/// Message sent by the client
#[allow(dead_code)]
#[derive(JsonSchema)]
struct MyMessage {
    kind: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct MyMessage2 {
    text: String,
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Collects every `$ref` string in `value`
fn collect_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                refs.push(target.clone());
            }
            map.values().for_each(|v| collect_refs(v, refs));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_refs(v, refs)),
        _ => {}
    }
}

/// Follows a `#/...` JSON pointer from the document root
fn resolves(document: &Value, reference: &str) -> bool {
    reference
        .strip_prefix('#')
        .and_then(|pointer| document.pointer(pointer))
        .is_some()
}

#[test]
fn test_single_http_route_end_to_end() {
    let routes: Vec<RouteDescriptor> =
        vec![HttpRoute::new("/items", "read_items", HttpMethod::Get).into()];

    let value = get_asyncapi(AsyncApiBuilder::new("MyAPI", "1.0.0"), &routes).unwrap();

    assert_eq!(
        value,
        json!({
            "asyncapi": "2.4.0",
            "info": {"title": "MyAPI", "version": "1.0.0"},
            "channels": {
                "/items": {
                    "description": "",
                    "subscribe": {
                        "operationId": "read_items_items_get",
                        "bindings": {
                            "http": {"type": "request", "method": "GET", "bindingVersion": "latest"}
                        }
                    }
                }
            }
        })
    );
}

#[test]
fn test_application_with_documentation_routes() {
    let routes: Vec<RouteDescriptor> = vec![
        HttpRoute::new("/asyncapi.json", "asyncapi_json", HttpMethod::Get)
            .with_unique_id("asyncapi_json")
            .into(),
        HttpRoute::new("/docs", "asyncapi_docs", HttpMethod::Get)
            .with_unique_id("asyncapi_docs")
            .into(),
    ];

    let value = get_asyncapi(AsyncApiBuilder::new("MyAPI", "1.0.0"), &routes).unwrap();

    let http_get = json!({"http": {"bindingVersion": "latest", "method": "GET", "type": "request"}});
    assert_eq!(
        value,
        json!({
            "asyncapi": "2.4.0",
            "channels": {
                "/asyncapi.json": {
                    "description": "",
                    "subscribe": {"bindings": http_get.clone(), "operationId": "asyncapi_json"}
                },
                "/docs": {
                    "description": "",
                    "subscribe": {"bindings": http_get, "operationId": "asyncapi_docs"}
                }
            },
            "info": {"title": "MyAPI", "version": "1.0.0"}
        })
    );
}

#[test]
fn test_websocket_subscribe_and_publish_messages() {
    let routes: Vec<RouteDescriptor> = vec![WebSocketRoute::new("/ws", "websocket_endpoint")
        .with_doc("Echo endpoint.")
        .subscribes("message", PayloadType::of::<MyMessage>())
        .publishes("reply", PayloadType::of::<MyMessage>())
        .publishes("notice", PayloadType::of::<MyMessage2>())
        .into()];

    let value = get_asyncapi(AsyncApiBuilder::new("MyAPI", "1.0.0"), &routes).unwrap();
    let channel = &value["channels"]["/ws"];
    let ws_binding = json!({"ws": {"method": "GET", "bindingVersion": "latest"}});

    assert_eq!(channel["description"], json!("Echo endpoint."));
    assert_eq!(
        channel["subscribe"],
        json!({
            "operationId": "websocket_endpoint_subscribe",
            "bindings": ws_binding.clone(),
            "message": {"$ref": "#/components/messages/MyMessage"}
        })
    );
    assert_eq!(
        channel["publish"],
        json!({
            "operationId": "websocket_endpoint_publish",
            "bindings": ws_binding,
            "message": {"oneOf": [
                {"$ref": "#/components/messages/MyMessage"},
                {"$ref": "#/components/messages/MyMessage2"}
            ]}
        })
    );

    let messages = value["components"]["messages"].as_object().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages["MyMessage"]["description"],
        json!("Message sent by the client")
    );
    assert_eq!(
        messages["MyMessage"]["payload"]["properties"],
        json!({"kind": {"type": "string"}})
    );
    assert_eq!(messages["MyMessage"]["payload"]["required"], json!(["kind"]));
    assert!(messages["MyMessage2"].get("description").is_none());
    assert_eq!(
        messages["MyMessage2"]["payload"]["properties"],
        json!({"text": {"type": "string"}})
    );
    assert!(value["components"].get("schemas").is_none());
}

#[test]
fn test_one_channel_per_distinct_included_path() {
    let routes: Vec<RouteDescriptor> = vec![
        HttpRoute::new("/a", "a", HttpMethod::Get).into(),
        HttpRoute::new("/b", "b", HttpMethod::Post).into(),
        HttpRoute::new("/a", "a_again", HttpMethod::Put).into(),
        HttpRoute::new("/hidden", "hidden", HttpMethod::Get).excluded().into(),
        WebSocketRoute::new("/ws", "ws").into(),
        RouteDescriptor::Other {
            path: "/static".to_string(),
        },
    ];

    let document = AsyncApiBuilder::new("t", "1").build(&routes).unwrap();

    let expected: BTreeSet<&str> = ["/a", "/b", "/ws"].into_iter().collect();
    let actual: BTreeSet<&str> = document.channels.keys().map(String::as_str).collect();
    assert_eq!(actual, expected);
    assert!(!document.channels.contains_key("/hidden"));
}

#[test]
fn test_build_is_idempotent() {
    let routes: Vec<RouteDescriptor> = vec![
        HttpRoute::new("/items", "items", HttpMethod::Get)
            .with_tags(["items"])
            .into(),
        WebSocketRoute::new("/ws", "chat")
            .subscribes("m", PayloadType::of::<MyMessage>())
            .publishes("n", PayloadType::of::<MyMessage2>())
            .into(),
    ];

    let first = serialize_json(&AsyncApiBuilder::new("t", "1").build(&routes).unwrap()).unwrap();
    let second = serialize_json(&AsyncApiBuilder::new("t", "1").build(&routes).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_manifest_end_to_end() {
    let manifest = RouteManifest::load(&fixture("chat_service.routes.yaml")).unwrap();
    let document = manifest.builder().build(&manifest).unwrap();
    let value = document.to_value().unwrap();

    // excluded and non-HTTP/WebSocket routes produce no channels
    let paths: Vec<&String> = document.channels.keys().collect();
    assert_eq!(paths, vec!["/rooms", "/rooms/{room}/ws"]);

    assert_eq!(
        value["channels"]["/rooms"]["subscribe"]["tags"],
        json!([{"name": "rooms"}])
    );
    assert_eq!(value["channels"]["/rooms"]["description"], json!("List open rooms"));

    let socket = &value["channels"]["/rooms/{room}/ws"];
    assert_eq!(
        socket["description"],
        json!("Room socket.\n\nClients send lines and receive lines and presence updates.")
    );
    assert_eq!(
        socket["subscribe"]["message"],
        json!({"$ref": "#/components/messages/ChatLine"})
    );
    assert_eq!(
        socket["publish"]["message"],
        json!({"oneOf": [
            {"$ref": "#/components/messages/ChatLine"},
            {"$ref": "#/components/messages/Presence"}
        ]})
    );

    let components = &value["components"];
    assert_eq!(
        components["schemas"],
        json!({"Author": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}}}})
    );
    assert_eq!(
        components["messages"]["ChatLine"]["payload"]["properties"]["author"],
        json!({"$ref": "#/components/schemas/Author"})
    );
    assert_eq!(components["securitySchemes"]["oauth2"]["type"], json!("oauth2"));
    assert_eq!(
        value["servers"]["production"]["security"],
        json!([{"oauth2": ["chat:read"]}])
    );
}

#[test]
fn test_every_reference_resolves() {
    let manifest = RouteManifest::load(&fixture("chat_service.routes.yaml")).unwrap();
    let value = manifest.builder().build(&manifest).unwrap().to_value().unwrap();

    let mut refs = Vec::new();
    collect_refs(&value, &mut refs);

    assert!(refs.len() >= 5, "expected message and schema refs, found {:?}", refs);
    for reference in &refs {
        assert!(resolves(&value, reference), "dangling reference {}", reference);
    }
}

#[test]
fn test_manifest_with_undefined_scope_fails() {
    let manifest = RouteManifest::load(&fixture("invalid_scope.routes.json")).unwrap();
    let err = manifest.builder().build(&manifest).unwrap_err();
    assert!(matches!(err, Error::UndefinedScope { ref scope, .. } if scope == "undefined"));
}

#[test]
fn test_document_validation_invalid_security_requirement_scopes() {
    let err = AsyncApi::from_value(json!({
        "asyncapi": "2.3.0",
        "info": {
            "title": "Validation",
            "version": "v1",
            "description": "Scopes on a non-oauth scheme"
        },
        "channels": {},
        "servers": {
            "development": {
                "url": "localhost",
                "protocol": "ws",
                "security": [{"test": ["a"]}]
            }
        },
        "components": {
            "securitySchemes": {
                "test": {"type": "http", "scheme": "basic"},
                "test2": {"type": "http", "scheme": "bearer", "bearerFormat": "JWT"},
                "testApiKey": {"type": "httpApiKey", "name": "test", "in": "header"},
                "oauth2": {
                    "type": "oauth2",
                    "flows": {
                        "implicit": {
                            "authorizationUrl": "https://localhost:12345",
                            "refreshUrl": "https://localhost:12345/refresh",
                            "scopes": {"a": "A", "b": "B"}
                        }
                    }
                }
            }
        }
    }))
    .unwrap_err();

    assert!(matches!(err, Error::ScopesNotAllowed { .. }));
    assert!(err.to_string().contains("development"));
}

#[test]
fn test_document_validation_missing_security_scheme() {
    let err = AsyncApi::from_value(json!({
        "asyncapi": "2.3.0",
        "info": {"title": "Validation", "version": "v1"},
        "channels": {},
        "servers": {
            "development": {
                "url": "localhost",
                "protocol": "ws",
                "security": [{"test": []}]
            }
        }
    }))
    .unwrap_err();

    assert!(matches!(err, Error::UnknownSecurityScheme { ref scheme, .. } if scheme == "test"));
}

#[test]
fn test_document_validation_two_schemes_in_requirement() {
    let err = AsyncApi::from_json_str(
        r#"{
            "asyncapi": "2.4.0",
            "info": {"title": "Validation", "version": "v1"},
            "channels": {},
            "servers": {
                "development": {
                    "url": "localhost",
                    "protocol": "ws",
                    "security": [{"a": [], "b": []}]
                }
            },
            "components": {
                "securitySchemes": {
                    "a": {"type": "http", "scheme": "basic"},
                    "b": {"type": "userPassword"}
                }
            }
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidSecurityRequirement { .. }));
}
