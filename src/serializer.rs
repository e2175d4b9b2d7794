//! Serialization of AsyncAPI documents to YAML or JSON, and file output.

use crate::model::AsyncApi;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &AsyncApi) -> Result<String> {
    debug!("Serializing AsyncAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize AsyncAPI document to YAML")
}

/// Serializes a document to pretty-printed JSON.
///
/// Maps are ordered, so serializing the same document twice yields identical
/// output.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &AsyncApi) -> Result<String> {
    debug!("Serializing AsyncAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize AsyncAPI document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
