use anyhow::Result;
use clap::{Parser, Subcommand};
use restrec::{init_tracing, AppState, Config, FacetFilter};
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a single restaurant recommendation query", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collaborative-filtering recommendations for a user
    Collaborative {
        /// User id; a random guest id is used when omitted
        #[arg(short, long)]
        user: Option<String>,

        #[arg(long)]
        cuisine_type: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        price_range: Option<String>,

        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Restaurants similar to the named one
    Similar { name: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing with specified log level
    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    let config = Config::load_or_default(&args.config)?;
    let sentinel = config.recommendation.all_facets_sentinel.clone();
    let state = AppState::new(config)?;

    let output = match args.command {
        Command::Collaborative {
            user,
            cuisine_type,
            location,
            price_range,
            n,
        } => {
            let user_id =
                user.unwrap_or_else(|| restrec::utils::random_guest_id(&mut rand::thread_rng()));
            info!("Querying collaborative recommendations for user {}", user_id);

            let filter = FacetFilter::from_selection(cuisine_type, location, price_range, &sentinel);
            let recommendations = state.serving_service.serve_collaborative(&user_id, &filter, n)?;
            serde_json::to_value(recommendations)?
        }
        Command::Similar { name } => {
            let recommendations = state.serving_service.serve_similar(&name)?;
            let posters: Vec<bool> = recommendations.posters.iter().map(Option::is_some).collect();
            json!({
                "restaurant_ids": recommendations.restaurant_ids,
                "names": recommendations.names,
                "scores": recommendations.scores,
                "has_poster": posters,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
