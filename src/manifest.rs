//! Route manifests: a YAML or JSON file listing an application's routes,
//! optionally with document metadata.
//!
//! ```yaml
//! asyncapi: 2.4.0
//! info:
//!   title: Chat
//!   version: 1.0.0
//! routes:
//!   - kind: http
//!     path: /health
//!     name: health
//!     methods: [GET]
//!   - kind: websocket
//!     path: /ws
//!     name: chat
//!     parameters:
//!       - name: incoming
//!         role: subscribe
//!         type:
//!           name: ChatLine
//!           schema: {type: object}
//! ```

use crate::asyncapi_builder::AsyncApiBuilder;
use crate::error::{Error, Result};
use crate::model::{
    AsyncApiVersion, ExternalDocumentation, Info, RefOr, SecurityScheme, Server, Tag,
};
use crate::route::{RouteDescriptor, RouteSource};
use crate::scanner::ManifestScanner;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DEFAULT_TITLE: &str = "Generated API";
const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asyncapi: Option<AsyncApiVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, Server>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, RefOr<SecurityScheme>>,
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
}

impl RouteManifest {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_yaml_str(yaml: &str) -> serde_yaml::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Reads one manifest, picking the format from the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading route manifest {}", path.display());
        let content = fs::read_to_string(path)?;
        let invalid = |message: String| Error::InvalidManifest {
            file: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content).map_err(|e| invalid(e.to_string())),
            Some("yaml") | Some("yml") => {
                Self::from_yaml_str(&content).map_err(|e| invalid(e.to_string()))
            }
            other => Err(invalid(format!(
                "unsupported manifest extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Loads a manifest file, or every manifest under a directory merged in
    /// path order
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Self::from_file(path);
        }

        let scan = ManifestScanner::new(path.to_path_buf())
            .scan()
            .map_err(|e| Error::InvalidManifest {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
        for warning in &scan.warnings {
            warn!("{}", warning);
        }
        info!("Found {} route manifests", scan.manifest_files.len());

        let mut manifest = Self::default();
        for file in &scan.manifest_files {
            manifest.merge(Self::from_file(file)?);
        }
        Ok(manifest)
    }

    /// Appends the routes of `other`. Metadata already set is kept; servers
    /// and security schemes of `other` are added.
    pub fn merge(&mut self, other: RouteManifest) {
        self.asyncapi = self.asyncapi.or(other.asyncapi);
        self.id = self.id.take().or(other.id);
        self.info = self.info.take().or(other.info);
        self.default_content_type = self.default_content_type.take().or(other.default_content_type);
        self.tags = self.tags.take().or(other.tags);
        self.external_docs = self.external_docs.take().or(other.external_docs);
        self.servers.extend(other.servers);
        self.security_schemes.extend(other.security_schemes);
        self.routes.extend(other.routes);
    }

    /// Document builder carrying the manifest metadata
    pub fn builder(&self) -> AsyncApiBuilder {
        let info = self
            .info
            .clone()
            .unwrap_or_else(|| Info::new(DEFAULT_TITLE, DEFAULT_VERSION));

        let mut builder = AsyncApiBuilder::new(info.title, info.version)
            .with_asyncapi_version(self.asyncapi.unwrap_or_default())
            .with_servers(self.servers.clone())
            .with_info_extensions(info.extensions);

        if let Some(description) = info.description {
            builder = builder.with_description(description);
        }
        if let Some(terms) = info.terms_of_service {
            builder = builder.with_terms_of_service(terms);
        }
        if let Some(contact) = info.contact {
            builder = builder.with_contact(contact);
        }
        if let Some(license) = info.license {
            builder = builder.with_license(license);
        }
        if let Some(id) = &self.id {
            builder = builder.with_id(id.clone());
        }
        if let Some(content_type) = &self.default_content_type {
            builder = builder.with_default_content_type(content_type.clone());
        }
        if let Some(tags) = &self.tags {
            builder = builder.with_tags(tags.clone());
        }
        if let Some(docs) = &self.external_docs {
            builder = builder.with_external_docs(docs.clone());
        }
        for (name, scheme) in &self.security_schemes {
            builder = builder.with_security_scheme(name.clone(), scheme.clone());
        }
        builder
    }
}

impl RouteSource for RouteManifest {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.routes.clone()
    }
}
