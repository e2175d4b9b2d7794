use crate::channel_builder::{ChannelBuilder, ChannelOptions, ChannelSet};
use crate::error::Result;
use crate::model::{
    AsyncApi, AsyncApiVersion, Components, Contact, Extensions, ExternalDocumentation, Info,
    License, RefOr, SecurityScheme, Server, Tag,
};
use crate::route::RouteSource;
use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;

/// AsyncAPI document builder.
///
/// Holds the caller-supplied metadata and composes it with the channels and
/// messages produced from the routes. Servers, tags and security schemes are
/// passed through unchanged.
#[derive(Debug, Clone)]
pub struct AsyncApiBuilder {
    asyncapi: AsyncApiVersion,
    id: Option<String>,
    info: Info,
    servers: BTreeMap<String, Server>,
    default_content_type: Option<String>,
    tags: Option<Vec<Tag>>,
    external_docs: Option<ExternalDocumentation>,
    security_schemes: BTreeMap<String, RefOr<SecurityScheme>>,
    channel_options: ChannelOptions,
}

impl AsyncApiBuilder {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            asyncapi: AsyncApiVersion::default(),
            id: None,
            info: Info::new(title, version),
            servers: BTreeMap::new(),
            default_content_type: None,
            tags: None,
            external_docs: None,
            security_schemes: BTreeMap::new(),
            channel_options: ChannelOptions::default(),
        }
    }

    pub fn with_asyncapi_version(mut self, version: AsyncApiVersion) -> Self {
        self.asyncapi = version;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = title.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = Some(description.into());
        self
    }

    pub fn with_terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.info.terms_of_service = Some(url.into());
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.info.contact = Some(contact);
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.info.license = Some(license);
        self
    }

    /// Extension keys placed on the `info` object
    pub fn with_info_extensions(mut self, extensions: Extensions) -> Self {
        self.info.extensions.extend(extensions);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_server(mut self, name: impl Into<String>, server: Server) -> Self {
        self.servers.insert(name.into(), server);
        self
    }

    pub fn with_servers(mut self, servers: BTreeMap<String, Server>) -> Self {
        self.servers.extend(servers);
        self
    }

    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = Some(content_type.into());
        self
    }

    pub fn with_external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }

    pub fn with_security_scheme(
        mut self,
        name: impl Into<String>,
        scheme: impl Into<RefOr<SecurityScheme>>,
    ) -> Self {
        self.security_schemes.insert(name.into(), scheme.into());
        self
    }

    pub fn with_channel_options(mut self, options: ChannelOptions) -> Self {
        self.channel_options = options;
        self
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Builds the document for every route of `source`
    pub fn build<S: RouteSource + ?Sized>(self, source: &S) -> Result<AsyncApi> {
        let routes = source.routes();
        info!("Building AsyncAPI document from {} routes", routes.len());

        let mut channels = ChannelBuilder::new(self.channel_options.clone());
        channels.add_routes(&routes)?;
        self.assemble(channels.build())
    }

    /// Composes the final document and validates it
    pub fn assemble(self, channel_set: ChannelSet) -> Result<AsyncApi> {
        debug!("Assembling AsyncAPI {} document", self.asyncapi);

        let ChannelSet { channels, registry } = channel_set;
        let (messages, schemas) = registry.into_parts();

        let components = Components {
            messages: (!messages.is_empty()).then(|| {
                messages
                    .into_iter()
                    .map(|(name, message)| (name, RefOr::Item(message)))
                    .collect()
            }),
            schemas: (!schemas.is_empty()).then_some(schemas),
            security_schemes: (!self.security_schemes.is_empty()).then_some(self.security_schemes),
            ..Default::default()
        };

        let document = AsyncApi {
            asyncapi: self.asyncapi,
            id: self.id,
            info: self.info,
            servers: (!self.servers.is_empty()).then_some(self.servers),
            default_content_type: self.default_content_type,
            channels,
            components: (!components.is_empty()).then_some(components),
            tags: self.tags,
            external_docs: self.external_docs,
            extensions: Extensions::new(),
        };

        document.validate()?;
        debug!(
            "Document ready: {} channels, components present: {}",
            document.channels.len(),
            document.components.is_some()
        );
        Ok(document)
    }
}

/// Builds the document for `routes` and returns it as JSON with every
/// absent field omitted
pub fn get_asyncapi<S: RouteSource + ?Sized>(builder: AsyncApiBuilder, routes: &S) -> Result<Value> {
    builder.build(routes)?.to_value()
}
