//! AsyncAPI generator - command-line tool for generating AsyncAPI documentation.
//!
//! Reads route manifests describing an application's HTTP and WebSocket
//! routes and writes the corresponding AsyncAPI 2.x document.
//!
//! # Usage
//!
//! ```bash
//! asyncapi-from-routes [OPTIONS] <MANIFEST_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! asyncapi-from-routes ./app.routes.yaml -o asyncapi.yaml
//! ```
//!
//! Generate JSON plus a viewer page:
//! ```bash
//! asyncapi-from-routes ./service -f json -o asyncapi.json --html docs.html --asyncapi-url /asyncapi.json
//! ```

use anyhow::Result;
use asyncapi_from_routes::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("AsyncAPI generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("AsyncAPI document generation completed successfully");

    Ok(())
}
