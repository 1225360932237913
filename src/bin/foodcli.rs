use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ff_places::{
    config::{load_app_config, AppConfig},
    constants::DIGEST_SIZE,
    recommend::{self, Criteria, MealType, Recommender},
    ApiKey, Client, ResultSnapshot, SearchRequest,
};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "foodcli", about = "Look up places and pick somewhere to eat.")]
struct CliArgs {
    #[command(subcommand)]
    pub subcommand: Command,

    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    #[arg(
        short = 'k',
        long,
        global = true,
        help = "Places API key. Overrides GOOGLE_PLACES_API_KEY."
    )]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(name = "geocode", about = "Resolve a zip code to coordinates")]
    Geocode {
        #[arg(short = 'z', long = "zip-code")]
        zip_code: String,
    },

    #[clap(name = "open-now", about = "Check whether a place is open right now")]
    OpenNow {
        #[arg(short = 'i', long = "place-id")]
        place_id: String,
    },

    #[clap(name = "find", about = "Search for open restaurants")]
    Find {
        #[command(flatten)]
        search_opts: SearchOpts,

        #[arg(short = 'o', long, help = "Write the snapshot here instead of stdout")]
        output_path: Option<PathBuf>,
    },

    #[clap(name = "recommend", about = "Pick a random open restaurant")]
    Recommend {
        #[arg(short = 'm', long = "meal-type", help = "breakfast, lunch or dinner")]
        meal_type: String,

        #[arg(short = 'c', long)]
        category: String,

        #[arg(short = 'z', long = "zip-code")]
        zip_code: String,

        #[arg(
            short = 'p',
            long = "price-level",
            value_parser = clap::value_parser!(u8).range(1..=4),
            help = "1 ($) to 4 ($$$$)"
        )]
        price_level: Option<u8>,

        #[arg(short = 'r', long, default_value_t = 5.0, help = "Search radius in miles")]
        radius: f64,

        #[arg(short = 'x', long, help = "Id of the current pick, to get a different one")]
        exclude: Option<String>,
    },

    #[clap(name = "show", about = "Summarize a saved snapshot")]
    Show {
        #[arg(short = 'i', long, help = "Snapshot to read. Defaults to the configured output path")]
        input: Option<PathBuf>,

        #[arg(short = 'n', long, default_value_t = DIGEST_SIZE)]
        count: usize,
    },
}

#[derive(Args, Debug)]
struct SearchOpts {
    #[arg(short = 'z', long = "zip-code")]
    pub zip_code: String,

    #[arg(short = 'r', long, help = "Search radius in miles")]
    pub radius: f64,

    #[arg(short = 's', long, help = "Keyword, e.g. a cuisine")]
    pub search: Option<String>,

    #[arg(
        short = 'p',
        long = "price-level",
        allow_hyphen_values = true,
        help = "0-4 or $ to $$$$$. Invalid values search all price levels"
    )]
    pub price_level: Option<String>,
}

fn client(config: &AppConfig) -> Result<Client> {
    Client::from_config(config).context("set GOOGLE_PLACES_API_KEY or pass --api-key")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let mut config = load_app_config()?;
    foodfinder::init_tracing(&config.log_level);
    if let Some(key) = args.global_opts.api_key.as_deref().and_then(ApiKey::from_raw) {
        config.api_key = Some(key);
    }

    match args.subcommand {
        Command::Geocode { zip_code } => {
            let coordinate = client(&config)?.geocode(&zip_code).await?;
            println!("{}", serde_json::to_string(&coordinate)?);
        }
        Command::OpenNow { place_id } => {
            let open_now = client(&config)?.open_now(&place_id).await?;
            println!("{}", json!({ "place_id": place_id, "open_now": open_now }));
        }
        Command::Find {
            search_opts,
            output_path,
        } => {
            let price_level = search_opts
                .price_level
                .as_deref()
                .and_then(foodfinder::price_level_or_any);
            let request = SearchRequest::builder()
                .postal_code(search_opts.zip_code)
                .radius_miles(search_opts.radius)
                .search_term(search_opts.search)
                .price_level(price_level)
                .build()?;
            let outcome = client(&config)?.find_open_restaurants(&request).await;
            let snapshot = ResultSnapshot::new(&request, outcome.restaurants);
            if let Some(output_path) = output_path {
                snapshot.save(&output_path).await?;
            } else {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
        }
        Command::Recommend {
            meal_type,
            category,
            zip_code,
            price_level,
            radius,
            exclude,
        } => {
            let meal_type: MealType = meal_type.parse()?;
            let criteria = Criteria::new(meal_type, &category, &zip_code, price_level, radius)?;
            let recommendations = Recommender::from_config(&config)
                .recommend(&criteria)
                .await;
            let mut rng = rand::rng();
            let pick = match exclude.as_deref() {
                Some(current_id) => {
                    recommend::pick_another(&recommendations.restaurants, current_id, &mut rng)
                }
                None => recommend::pick(&recommendations.restaurants, &mut rng),
            };
            let alternatives: Vec<_> = recommendations
                .restaurants
                .iter()
                .filter(|r| pick.map_or(true, |picked| picked.id != r.id))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "source": recommendations.source,
                    "pick": pick,
                    "alternatives": alternatives,
                }))?
            );
        }
        Command::Show { input, count } => {
            let path = input.unwrap_or(config.output_path);
            let snapshot = ResultSnapshot::load(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            print!("{}", foodfinder::digest(&snapshot, count));
        }
    }

    Ok(())
}
