use crate::api::ODDS_FEED_BASE_URL;
use crate::models::{Sport, PINNACLE_ID};
use crate::utils::arbitrage::DEFAULT_TOTAL_STAKE;
use crate::utils::scanner::ScanSettings;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the odds feed (ODDS_FEED_URL)
    pub feed_url: String,
    /// Sports to fetch (SPORTS, comma separated labels, e.g. "CFB,NFL")
    pub sports: Vec<Sport>,
    /// Book used for no-vig lines (REFERENCE_BOOK_ID)
    pub reference_book_id: i32,
    /// Amount split across arbitrage legs (TOTAL_STAKE)
    pub total_stake: f64,
    /// Where JSON caches and CSV exports go (CACHE_DIR)
    pub cache_dir: PathBuf,
    /// Read odds from the cache when present (USE_CACHE=1)
    pub use_cache: bool,
    /// Address the web server listens on (WEB_ADDR)
    pub web_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: ODDS_FEED_BASE_URL.to_string(),
            sports: Sport::ALL.to_vec(),
            reference_book_id: PINNACLE_ID,
            total_stake: DEFAULT_TOTAL_STAKE,
            cache_dir: PathBuf::from("cache"),
            use_cache: false,
            web_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Build the config from environment variables (load .env first)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; missing keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let sports = match lookup("SPORTS") {
            Some(list) => parse_sports(&list)?,
            None => defaults.sports,
        };

        let reference_book_id = match lookup("REFERENCE_BOOK_ID") {
            Some(id) => id
                .trim()
                .parse::<i32>()
                .context("REFERENCE_BOOK_ID must be an integer sportsbook id")?,
            None => defaults.reference_book_id,
        };

        let total_stake = match lookup("TOTAL_STAKE") {
            Some(stake) => {
                let stake = stake
                    .trim()
                    .parse::<f64>()
                    .context("TOTAL_STAKE must be a number")?;
                if !stake.is_finite() || stake <= 0.0 {
                    bail!("TOTAL_STAKE must be positive, got {}", stake);
                }
                stake
            }
            None => defaults.total_stake,
        };

        Ok(Self {
            feed_url: lookup("ODDS_FEED_URL").unwrap_or(defaults.feed_url),
            sports,
            reference_book_id,
            total_stake,
            cache_dir: lookup("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            use_cache: lookup("USE_CACHE").map(|v| v == "1").unwrap_or(false),
            web_addr: lookup("WEB_ADDR").unwrap_or(defaults.web_addr),
        })
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            reference_book_id: self.reference_book_id,
            total_stake: self.total_stake,
        }
    }

    pub fn odds_cache_file(&self, sport: Sport) -> PathBuf {
        self.cache_dir
            .join(format!("{}_odds_cache.json", sport.label().to_lowercase()))
    }
}

fn parse_sports(list: &str) -> Result<Vec<Sport>> {
    let mut sports = Vec::new();
    for label in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let sport = Sport::from_label(label)
            .with_context(|| format!("Unknown sport '{}' in SPORTS", label))?;
        if !sports.contains(&sport) {
            sports.push(sport);
        }
    }
    if sports.is_empty() {
        bail!("SPORTS must name at least one sport");
    }
    Ok(sports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scan_settings(), ScanSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SPORTS", "nfl, MLB,NFL"),
            ("REFERENCE_BOOK_ID", "5"),
            ("TOTAL_STAKE", "250"),
            ("CACHE_DIR", "/tmp/odds"),
            ("USE_CACHE", "1"),
        ]))
        .unwrap();

        assert_eq!(config.sports, vec![Sport::Nfl, Sport::Mlb]);
        assert_eq!(config.reference_book_id, 5);
        assert_eq!(config.total_stake, 250.0);
        assert!(config.use_cache);
        assert_eq!(
            config.odds_cache_file(Sport::Nfl),
            PathBuf::from("/tmp/odds/nfl_odds_cache.json")
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup_from(&[("SPORTS", "NHL")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SPORTS", " , ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REFERENCE_BOOK_ID", "pinnacle")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("TOTAL_STAKE", "-5")])).is_err());
    }
}
