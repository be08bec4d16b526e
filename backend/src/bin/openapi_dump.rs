//! Print the OpenAPI document as JSON or YAML.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use rentease::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// Render the RentEase OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", version)]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn render(format: Format) -> Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().wrap_err("serialise OpenAPI as JSON"),
        Format::Yaml => doc.to_yaml().wrap_err("serialise OpenAPI as YAML"),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let rendered = render(cli.format)?;
    match cli.output {
        Some(path) => fs::write(&path, rendered)
            .wrap_err_with(|| format!("write OpenAPI document to {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
