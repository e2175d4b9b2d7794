//! Cross-checks server security requirements against the security schemes
//! declared under `components.securitySchemes`.
//!
//! For every requirement object of every server:
//!
//! 1. it must name exactly one scheme,
//! 2. the scheme must exist (a `$ref` entry is followed one hop within
//!    `components.securitySchemes`),
//! 3. scopes may only be requested from `oauth2` and `openIdConnect` schemes,
//! 4. scopes requested from an `oauth2` scheme with flows must be declared by
//!    at least one of those flows.

use crate::error::{Error, Result};
use crate::model::{AsyncApi, RefOr, SecurityScheme, SecurityRequirement, SecuritySchemeType};
use log::debug;
use std::collections::BTreeMap;

type Schemes = BTreeMap<String, RefOr<SecurityScheme>>;

/// Validates every server's security requirements. Fails on the first violation.
pub fn validate_security(document: &AsyncApi) -> Result<()> {
    let Some(servers) = document.servers.as_ref() else {
        return Ok(());
    };
    let empty = Schemes::new();
    let schemes = document.security_schemes().unwrap_or(&empty);

    for (server_name, server) in servers {
        for requirement in server.security.iter().flatten() {
            validate_requirement(server_name, requirement, schemes)?;
        }
    }
    Ok(())
}

fn validate_requirement(
    server: &str,
    requirement: &SecurityRequirement,
    schemes: &Schemes,
) -> Result<()> {
    let mut entries = requirement.iter();
    let (scheme_name, scopes) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(Error::InvalidSecurityRequirement {
                server: server.to_string(),
                schemes: requirement.keys().cloned().collect(),
            })
        }
    };
    debug!(
        "Checking security requirement {} {:?} on server {}",
        scheme_name, scopes, server
    );

    let scheme = resolve_scheme(scheme_name, schemes).ok_or_else(|| Error::UnknownSecurityScheme {
        server: server.to_string(),
        scheme: scheme_name.clone(),
    })?;

    if scopes.is_empty() {
        return Ok(());
    }

    if !scheme.scheme_type.accepts_scopes() {
        return Err(Error::ScopesNotAllowed {
            server: server.to_string(),
            scheme: scheme_name.clone(),
            scheme_type: scheme.scheme_type.to_string(),
        });
    }

    if scheme.scheme_type == SecuritySchemeType::Oauth2 {
        if let Some(flows) = scheme.flows.as_ref() {
            let declared = flows.scope_names();
            if let Some(scope) = scopes.iter().find(|s| !declared.contains(s.as_str())) {
                return Err(Error::UndefinedScope {
                    server: server.to_string(),
                    scheme: scheme_name.clone(),
                    scope: scope.clone(),
                });
            }
        }
    }
    Ok(())
}

fn resolve_scheme<'a>(name: &str, schemes: &'a Schemes) -> Option<&'a SecurityScheme> {
    match schemes.get(name)? {
        RefOr::Item(scheme) => Some(scheme),
        RefOr::Ref(reference) => reference
            .component_name("securitySchemes")
            .and_then(|target| schemes.get(target))
            .and_then(RefOr::as_item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Components, Info, OAuthFlow, OAuthFlows, Protocol, Reference, Server};
    use serde_json::json;

    fn document(server: Server, schemes: Vec<(&str, RefOr<SecurityScheme>)>) -> AsyncApi {
        let components = if schemes.is_empty() {
            None
        } else {
            Some(Components {
                security_schemes: Some(
                    schemes
                        .into_iter()
                        .map(|(name, scheme)| (name.to_string(), scheme))
                        .collect(),
                ),
                ..Default::default()
            })
        };
        AsyncApi {
            asyncapi: Default::default(),
            id: None,
            info: Info::new("test", "1.0.0"),
            servers: Some([("development".to_string(), server)].into_iter().collect()),
            default_content_type: None,
            channels: BTreeMap::new(),
            components,
            tags: None,
            external_docs: None,
            extensions: Default::default(),
        }
    }

    fn oauth2() -> SecurityScheme {
        let mut scopes = BTreeMap::new();
        scopes.insert("a".to_string(), "A".to_string());
        scopes.insert("b".to_string(), "B".to_string());
        SecurityScheme::oauth2(OAuthFlows {
            implicit: Some(OAuthFlow {
                authorization_url: Some("https://localhost:12345".to_string()),
                scopes,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn ws_server() -> Server {
        Server::new("localhost", Protocol::Ws)
    }

    #[test]
    fn test_no_servers_is_valid() {
        let mut doc = document(ws_server(), vec![]);
        doc.servers = None;
        assert!(validate_security(&doc).is_ok());
    }

    #[test]
    fn test_server_without_security_is_valid() {
        assert!(validate_security(&document(ws_server(), vec![])).is_ok());
    }

    #[test]
    fn test_two_schemes_in_one_requirement() {
        let mut requirement = SecurityRequirement::new();
        requirement.insert("basic".to_string(), vec![]);
        requirement.insert("oauth2".to_string(), vec![]);
        let mut server = ws_server();
        server.security = Some(vec![requirement]);

        let doc = document(
            server,
            vec![
                ("basic", SecurityScheme::http("basic").into()),
                ("oauth2", oauth2().into()),
            ],
        );
        let err = validate_security(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSecurityRequirement { ref schemes, .. } if schemes == &["basic", "oauth2"]
        ));
    }

    #[test]
    fn test_empty_requirement_object() {
        let mut server = ws_server();
        server.security = Some(vec![SecurityRequirement::new()]);
        let err = validate_security(&document(server, vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidSecurityRequirement { .. }));
    }

    #[test]
    fn test_unknown_scheme_without_components() {
        let server = ws_server().with_security("test", Vec::<String>::new());
        let err = validate_security(&document(server, vec![])).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownSecurityScheme { ref server, ref scheme } if server == "development" && scheme == "test"
        ));
    }

    #[test]
    fn test_scopes_not_allowed_for_http_scheme() {
        let server = ws_server().with_security("test", ["a"]);
        let doc = document(
            server,
            vec![
                ("test", SecurityScheme::http("basic").into()),
                ("oauth2", oauth2().into()),
            ],
        );
        let err = validate_security(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::ScopesNotAllowed { ref scheme_type, .. } if scheme_type == "http"
        ));
    }

    #[test]
    fn test_undefined_oauth2_scope() {
        let server = ws_server().with_security("oauth2", ["undefined"]);
        let doc = document(server, vec![("oauth2", oauth2().into())]);
        let err = validate_security(&doc).unwrap_err();
        assert!(matches!(err, Error::UndefinedScope { ref scope, .. } if scope == "undefined"));
    }

    #[test]
    fn test_declared_oauth2_scopes_pass() {
        let server = ws_server().with_security("oauth2", ["a", "b"]);
        let doc = document(server, vec![("oauth2", oauth2().into())]);
        assert!(validate_security(&doc).is_ok());
    }

    #[test]
    fn test_open_id_connect_accepts_any_scope() {
        let mut scheme = SecurityScheme::new(SecuritySchemeType::OpenIdConnect);
        scheme.open_id_connect_url = Some("https://id.example.com".to_string());
        let server = ws_server().with_security("oidc", ["profile"]);
        let doc = document(server, vec![("oidc", scheme.into())]);
        assert!(validate_security(&doc).is_ok());
    }

    #[test]
    fn test_referenced_scheme_is_followed() {
        let server = ws_server().with_security("alias", ["c"]);
        let doc = document(
            server,
            vec![
                (
                    "alias",
                    RefOr::Ref(Reference::component("securitySchemes", "oauth2")),
                ),
                ("oauth2", oauth2().into()),
            ],
        );
        let err = validate_security(&doc).unwrap_err();
        assert!(matches!(err, Error::UndefinedScope { ref scheme, .. } if scheme == "alias"));
    }

    #[test]
    fn test_dangling_scheme_reference_is_unknown() {
        let server = ws_server().with_security("alias", Vec::<String>::new());
        let doc = document(
            server,
            vec![(
                "alias",
                RefOr::Ref(Reference::component("securitySchemes", "missing")),
            )],
        );
        let err = validate_security(&doc).unwrap_err();
        assert!(matches!(err, Error::UnknownSecurityScheme { .. }));
    }

    #[test]
    fn test_validation_runs_on_parse() {
        let err = AsyncApi::from_value(json!({
            "asyncapi": "2.3.0",
            "info": {"title": "t", "version": "v"},
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
                    "testApiKey": {"type": "httpApiKey", "name": "test", "in": "header"}
                }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::ScopesNotAllowed { .. }));
    }
}
