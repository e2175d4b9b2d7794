use super::Extensions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    UserPassword,
    ApiKey,
    #[serde(rename = "X509")]
    X509,
    SymmetricEncryption,
    AsymmetricEncryption,
    HttpApiKey,
    Http,
    Oauth2,
    OpenIdConnect,
    Plain,
    ScramSha256,
    ScramSha512,
    Gssapi,
}

impl SecuritySchemeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecuritySchemeType::UserPassword => "userPassword",
            SecuritySchemeType::ApiKey => "apiKey",
            SecuritySchemeType::X509 => "X509",
            SecuritySchemeType::SymmetricEncryption => "symmetricEncryption",
            SecuritySchemeType::AsymmetricEncryption => "asymmetricEncryption",
            SecuritySchemeType::HttpApiKey => "httpApiKey",
            SecuritySchemeType::Http => "http",
            SecuritySchemeType::Oauth2 => "oauth2",
            SecuritySchemeType::OpenIdConnect => "openIdConnect",
            SecuritySchemeType::Plain => "plain",
            SecuritySchemeType::ScramSha256 => "scramSha256",
            SecuritySchemeType::ScramSha512 => "scramSha512",
            SecuritySchemeType::Gssapi => "gssapi",
        }
    }

    /// Only oauth2 and openIdConnect requirements may list scopes
    pub fn accepts_scopes(&self) -> bool {
        matches!(
            self,
            SecuritySchemeType::Oauth2 | SecuritySchemeType::OpenIdConnect
        )
    }
}

impl fmt::Display for SecuritySchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an API key is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    User,
    Password,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    pub fn iter(&self) -> impl Iterator<Item = &OAuthFlow> {
        [
            &self.implicit,
            &self.password,
            &self.client_credentials,
            &self.authorization_code,
        ]
        .into_iter()
        .flatten()
    }

    /// Union of the scope names declared by every flow
    pub fn scope_names(&self) -> BTreeSet<&str> {
        self.iter()
            .flat_map(|flow| flow.scopes.keys().map(String::as_str))
            .collect()
    }
}

/// Security scheme definition; which optional fields apply depends on `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiKeyLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl SecurityScheme {
    pub fn new(scheme_type: SecuritySchemeType) -> Self {
        Self {
            scheme_type,
            description: None,
            name: None,
            location: None,
            scheme: None,
            bearer_format: None,
            flows: None,
            open_id_connect_url: None,
            extensions: Extensions::new(),
        }
    }

    /// `http` scheme such as `basic` or `bearer`
    pub fn http(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            ..Self::new(SecuritySchemeType::Http)
        }
    }

    pub fn oauth2(flows: OAuthFlows) -> Self {
        Self {
            flows: Some(flows),
            ..Self::new(SecuritySchemeType::Oauth2)
        }
    }
}
