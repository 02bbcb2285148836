use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{builder::NonEmptyStringValueParser, Parser};
use rw_nycgo::{generate::generate, outfile::OutFile, util::default_http_client};
use tracing_subscriber::EnvFilter;

/// Generates an HTML map of the NYC restaurant week restaurants.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(
        value_name = "API_KEY",
        value_parser = NonEmptyStringValueParser::new(),
        help = "Google Maps JavaScript API key"
    )]
    api_key: String,

    #[arg(value_name = "OUTFILE", help = "File to save the HTML page to")]
    outfile: PathBuf,

    #[arg(long, help = "Overwrite the outfile if it already exists")]
    overwrite: bool,

    #[arg(
        short = 'e',
        long,
        help = "Endpoint to retrieve restaurants from. Defaults to the NYC Go restaurant week grid."
    )]
    feed_endpoint: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let http = default_http_client().context("unable to build the HTTP client")?;
    let outfile = OutFile::new(args.outfile, args.overwrite);
    generate(&http, &args.api_key, args.feed_endpoint.as_deref(), &outfile).await?;
    Ok(())
}
