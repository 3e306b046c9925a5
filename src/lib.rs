pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use api::*;
pub use config::Config;
pub use error::OddsError;
pub use models::*;
pub use utils::*;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utils::data::{load_from_cache, save_to_cache};
use utils::scanner::{scan_sports_concurrently, ScanResults};

/// Everything the front ends display: the raw slates plus both scans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsData {
    pub sports: SportsData,
    pub ev_bets: Vec<EvResult>,
    pub arbitrages: Vec<ArbitrageResult>,
}

/// Load odds for every configured sport, from cache or the feed
pub async fn load_sports_data(config: &Config) -> Result<SportsData> {
    let mut sports = SportsData::new();
    let mut to_fetch = Vec::new();

    for &sport in &config.sports {
        let cache_file = config.odds_cache_file(sport);
        if config.use_cache && cache_file.exists() {
            info!(sport = %sport, "Loading odds from cache file: {}", cache_file.display());
            let events: Vec<Event> = load_from_cache(&cache_file)?;
            sports.insert(sport.label().to_string(), events);
        } else {
            to_fetch.push(sport);
        }
    }

    if !to_fetch.is_empty() {
        let client = OddsFeedClient::new(config.feed_url.clone());
        let fetched = client.fetch_sports(&to_fetch).await?;

        for &sport in &to_fetch {
            let Some(events) = fetched.get(sport.label()) else {
                continue;
            };
            let cache_file = config.odds_cache_file(sport);
            save_to_cache(events, &cache_file)?;
            info!(sport = %sport, "Saved odds to cache file: {}", cache_file.display());
        }
        sports.extend(fetched);
    }

    Ok(sports)
}

/// Fetch all odds and run the +EV and arbitrage scans
pub async fn fetch_all_odds_data(config: &Config) -> Result<OddsData> {
    let sports = Arc::new(load_sports_data(config).await?);

    let ScanResults {
        ev_bets,
        arbitrages,
    } = scan_sports_concurrently(Arc::clone(&sports), config.scan_settings()).await?;

    let sports = Arc::try_unwrap(sports).unwrap_or_else(|shared| (*shared).clone());

    Ok(OddsData {
        sports,
        ev_bets,
        arbitrages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_cached_sports_skip_the_feed() {
        let cache_dir =
            std::env::temp_dir().join(format!("sportsbook_odds_ev_lib_{}", std::process::id()));
        let config = Config {
            // Nothing listens here; any fetch would fail the test
            feed_url: "http://127.0.0.1:9".to_string(),
            sports: vec![Sport::Nfl],
            cache_dir,
            use_cache: true,
            ..Config::default()
        };

        let start = NaiveDate::from_ymd_opt(2024, 9, 8)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        let events = vec![Event::new(4412, start, Team::named("Bills"), Team::named("Dolphins"))];
        save_to_cache(&events, config.odds_cache_file(Sport::Nfl)).unwrap();

        let sports = load_sports_data(&config).await.unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports["NFL"], events);
    }
}
