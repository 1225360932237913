use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use ff_places::{config::load_app_config, Client, SearchRequest};
use foodfinder::FindStatus;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "ff-find",
    about = "Find open restaurants near a zip code and export them to JSON."
)]
struct Args {
    #[arg(short = 'z', long = "zip-code", help = "Zip code to search from.")]
    zip_code: String,
    #[arg(short = 'r', long, help = "Search radius in miles.")]
    radius: f64,
    #[arg(
        short = 's',
        long,
        help = "Cuisine or restaurant type, e.g. mexican, bagels, asian."
    )]
    search: Option<String>,
    #[arg(
        short = 'p',
        long = "price-level",
        allow_hyphen_values = true,
        help = "Price level, 0-4 or $ to $$$$$. Invalid values search all price levels."
    )]
    price_level: Option<String>,
    #[arg(
        short = 'o',
        long,
        help = "Output file. Defaults to FOODFINDER_OUTPUT_PATH, then results.json."
    )]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_app_config()?;
    foodfinder::init_tracing(&config.log_level);

    let price_level = args.price_level.as_deref().and_then(foodfinder::price_level_or_any);
    let request = SearchRequest::builder()
        .postal_code(args.zip_code)
        .radius_miles(args.radius)
        .search_term(args.search)
        .price_level(price_level)
        .build()?;
    let client = Client::from_config(&config)
        .context("set GOOGLE_PLACES_API_KEY to search for restaurants")?;

    info!(
        postal_code = request.postal_code(),
        radius_miles = request.radius_miles(),
        search_term = request.search_term(),
        "starting search"
    );
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {msg}",
    )?);
    spinner.set_message("Searching for open restaurants...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let outcome = client.find_open_restaurants(&request).await;
    spinner.finish_and_clear();

    let output = args.output.unwrap_or(config.output_path);
    let status =
        foodfinder::report_results(&request, outcome.restaurants, &output, &mut io::stdout())
            .await?;
    if status == FindStatus::NothingFound {
        eprintln!("No open restaurants found matching your criteria.");
    }
    Ok(status.exit_code())
}
