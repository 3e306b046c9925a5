use anyhow::{Context, Result};
use clap::Parser;
use sportsbook_odds_ev::data::{save_arbitrage_to_csv, save_ev_bets_to_csv};
use sportsbook_odds_ev::{fetch_all_odds_data, Config, Sport};

/// Scan sportsbook odds for +EV bets and arbitrage
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Read odds from the JSON cache instead of the feed when available
    #[arg(long)]
    use_cache: bool,

    /// Write the results to CSV files in the cache directory
    #[arg(long)]
    save_csv: bool,

    /// Show at most this many rows per list
    #[arg(long, default_value_t = 30)]
    top: usize,

    /// Only scan these sports (CFB, NFL, MLB); repeat for several
    #[arg(long = "sport")]
    sports: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config.use_cache |= cli.use_cache;
    if !cli.sports.is_empty() {
        config.sports = cli
            .sports
            .iter()
            .map(|label| {
                Sport::from_label(label).with_context(|| format!("Unknown sport '{}'", label))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    println!("Sportsbook Odds EV Scanner\n");
    println!(
        "Fetching odds for {}...\n",
        config
            .sports
            .iter()
            .map(|sport| sport.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let data = fetch_all_odds_data(&config)
        .await
        .context("Failed to load odds")?;

    println!("PLUS EV BETS\n");
    if data.ev_bets.is_empty() {
        println!("No positive EV bets found.");
    } else {
        println!("Top {} EV Bets:\n", data.ev_bets.len().min(cli.top));
        for (i, bet) in data.ev_bets.iter().take(cli.top).enumerate() {
            println!("{}. {}", i + 1, bet.format());
        }
    }

    println!("\nARBITRAGE OPPORTUNITIES\n");
    if data.arbitrages.is_empty() {
        println!("No arbitrage opportunities found.");
    } else {
        println!(
            "Found {} Arbitrage Opportunities:\n",
            data.arbitrages.len()
        );
        for (i, arb) in data.arbitrages.iter().take(cli.top).enumerate() {
            println!("{}. {}", i + 1, arb.format());
        }
    }

    if cli.save_csv {
        std::fs::create_dir_all(&config.cache_dir).context("Failed to create cache directory")?;

        if !data.ev_bets.is_empty() {
            let path = config.cache_dir.join("ev_bets.csv");
            save_ev_bets_to_csv(&data.ev_bets, &path)?;
            println!("\nSaved EV bets to {}", path.display());
        }

        if !data.arbitrages.is_empty() {
            let path = config.cache_dir.join("arbitrage.csv");
            save_arbitrage_to_csv(&data.arbitrages, &path)?;
            println!("Saved arbitrage to {}", path.display());
        }
    }

    Ok(())
}
