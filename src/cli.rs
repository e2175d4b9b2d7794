use crate::manifest::RouteManifest;
use crate::model::AsyncApiVersion;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::viewer::AsyncApiViewer;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// AsyncAPI generator - builds AsyncAPI documentation from an application's route manifests
#[derive(Parser, Debug)]
#[command(name = "asyncapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route manifest file, or a directory searched for *.routes.{json,yaml,yml}
    #[arg(value_name = "MANIFEST_PATH")]
    pub manifest_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// AsyncAPI version to emit (2.0.0 to 2.4.0), overrides the manifest
    #[arg(long = "asyncapi-version", value_name = "VERSION")]
    pub asyncapi_version: Option<AsyncApiVersion>,

    /// API title, overrides the manifest
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version, overrides the manifest
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Also write an HTML viewer page to this file
    #[arg(long = "html", value_name = "FILE", requires = "asyncapi_url")]
    pub html_path: Option<PathBuf>,

    /// URL the viewer page loads the document from
    #[arg(long = "asyncapi-url", value_name = "URL")]
    pub asyncapi_url: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest path does not exist: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest path: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }
    if let Some(html) = &args.html_path {
        info!("Viewer page: {}", html.display());
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting AsyncAPI document generation...");

    // Step 1: Load route manifests
    let manifest = RouteManifest::load(&args.manifest_path)
        .with_context(|| format!("Failed to load {}", args.manifest_path.display()))?;
    info!("Loaded {} routes", manifest.routes.len());
    if manifest.routes.is_empty() {
        log::warn!("No routes found in the manifest");
    }

    // Step 2: Apply command-line overrides
    let mut builder = manifest.builder();
    if let Some(version) = args.asyncapi_version {
        builder = builder.with_asyncapi_version(version);
    }
    if let Some(title) = &args.title {
        builder = builder.with_title(title.clone());
    }
    if let Some(api_version) = &args.api_version {
        builder = builder.with_version(api_version.clone());
    }
    let title = builder.info().title.clone();

    // Step 3: Build and validate the document
    info!("Building AsyncAPI document...");
    let document = builder.build(&manifest)?;
    info!(
        "AsyncAPI document built successfully: {} channels",
        document.channels.len()
    );

    // Step 4: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    // Step 6: Optional viewer page
    if let (Some(html_path), Some(url)) = (&args.html_path, &args.asyncapi_url) {
        let page = AsyncApiViewer::new(url.clone()).title(title).render();
        write_to_file(&page, html_path)?;
        info!("Wrote viewer page to {}", html_path.display());
    }

    info!("Generation complete!");
    Ok(())
}
