use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffixes recognised as route manifests
pub const MANIFEST_SUFFIXES: [&str; 3] = [".routes.json", ".routes.yaml", ".routes.yml"];

/// Scanner for route manifest files.
///
/// Recursively walks a directory and collects every route manifest
/// (`*.routes.json`, `*.routes.yaml`, `*.routes.yml`). The `target` directory
/// and hidden directories are skipped.
///
/// # Example
///
/// ```no_run
/// use asyncapi_from_routes::scanner::ManifestScanner;
/// use std::path::PathBuf;
///
/// let scanner = ManifestScanner::new(PathBuf::from("./my-service"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} route manifests", result.manifest_files.len());
/// ```
pub struct ManifestScanner {
    root_path: PathBuf,
}

/// Result of a directory scan
pub struct ScanResult {
    /// Manifest paths in sorted order
    pub manifest_files: Vec<PathBuf>,
    /// Paths that could not be accessed
    pub warnings: Vec<String>,
}

/// Whether `path` names a route manifest
pub fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| MANIFEST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

impl ManifestScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the directory tree. Inaccessible entries are reported as
    /// warnings and scanning continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut manifest_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_manifest(path) {
                        manifest_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            manifest_files,
            warnings,
        })
    }
}
