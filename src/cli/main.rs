use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use shoptag_listings::{config, pipeline, table};

#[derive(Parser, Debug)]
#[command(
    name = "shoptag-listings",
    version,
    about = "Generate product listings (title, description, keywords) for a folder of images using the ShopTag.ai API"
)]
struct Cli {
    /// Directory containing the product images
    #[arg(value_name = "INPUT_DIR", required_unless_present = "init")]
    input_dir: Option<PathBuf>,

    /// Where to write the CSV file
    #[arg(value_name = "OUTPUT_FILE", required_unless_present = "init")]
    output_file: Option<PathBuf>,

    /// ShopTag.ai API token
    #[arg(value_name = "API_TOKEN", required_unless_present = "init")]
    api_token: Option<String>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Language for the generated text (overrides config)
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Maximum keywords per image (overrides config)
    #[arg(long, value_name = "N")]
    max_keywords: Option<u32>,

    /// Also print the batch report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let input_dir = cli.input_dir.context("Missing INPUT_DIR")?;
    let output_file = cli.output_file.context("Missing OUTPUT_FILE")?;
    let api_token = cli.api_token.context("Missing API_TOKEN")?;

    // Load config and apply CLI overrides
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(language) = cli.language {
        config.api.language = language;
    }
    if let Some(max_keywords) = cli.max_keywords {
        config.api.max_keywords = max_keywords;
    }
    config.validate()?;

    let images = pipeline::collect_images(&input_dir)?;
    log::info!("Found {} image(s) to process", images.len());

    let service = pipeline::build_service(&config, &api_token)?;
    log::debug!(
        "Endpoint: {} (language={}, maxKeywords={})",
        config.api.endpoint,
        config.api.language,
        config.api.max_keywords
    );

    let report = pipeline::process_images(&images, &service).await;

    table::write_listings(&output_file, &report.rows)?;
    log::info!("CSV file saved to {}", output_file.display());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    log::info!(
        "Done: {} succeeded, {} failed out of {} images",
        report.rows.len(),
        report.failures.len(),
        report.total()
    );

    Ok(())
}
