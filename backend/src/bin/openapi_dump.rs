//! Print the gateway's OpenAPI document.

use clap::Parser;
use gateway::ApiDoc;
use utoipa::OpenApi;

/// Print the OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", version, about)]
struct Cli {
    /// Emit YAML instead of JSON.
    #[arg(long)]
    yaml: bool,
    /// Pretty-print JSON output.
    #[arg(long, conflicts_with = "yaml")]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let rendered = if cli.yaml {
        doc.to_yaml()?
    } else if cli.pretty {
        doc.to_pretty_json()?
    } else {
        doc.to_json()?
    };
    println!("{rendered}");
    Ok(())
}
