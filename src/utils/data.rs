use crate::models::{ArbitrageResult, EvResult};
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Save any serializable data to a JSON cache file, creating the directory if needed
pub fn save_to_cache<T: Serialize + ?Sized>(data: &T, cache_file: impl AsRef<Path>) -> Result<()> {
    let cache_file = cache_file.as_ref();
    if let Some(parent) = cache_file.parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize cache data")?;
    std::fs::write(cache_file, json)
        .with_context(|| format!("Failed to write cache file {}", cache_file.display()))?;
    Ok(())
}

/// Load data from a JSON cache file
pub fn load_from_cache<T: DeserializeOwned>(cache_file: impl AsRef<Path>) -> Result<T> {
    let cache_file = cache_file.as_ref();
    let json = std::fs::read_to_string(cache_file)
        .with_context(|| format!("Failed to read cache file {}", cache_file.display()))?;
    serde_json::from_str(&json).context("Failed to deserialize cache data")
}

/// Save +EV bets to CSV
pub fn save_ev_bets_to_csv(bets: &[EvResult], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Sport",
        "Line Type",
        "Game",
        "Market",
        "Bet",
        "Points",
        "Sportsbook",
        "Odds",
        "Fair Odds",
        "Expected Value (%)",
    ])?;

    for bet in bets {
        writer.write_record([
            bet.sport.clone(),
            bet.line_type.clone(),
            bet.game.clone(),
            bet.market.to_string(),
            bet.team.clone(),
            bet.points.map(|p| format!("{:.1}", p)).unwrap_or_default(),
            bet.book.clone(),
            bet.odds.to_string(),
            bet.fair_odds.to_string(),
            format!("{:.2}", bet.ev_percentage),
        ])?;
    }

    writer.flush().context("Failed to write CSV file")?;
    Ok(())
}

/// Save arbitrage opportunities to CSV
pub fn save_arbitrage_to_csv(arbs: &[ArbitrageResult], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Sport",
        "Line Type",
        "Game",
        "Market",
        "Side 1 Team",
        "Side 1 Sportsbook",
        "Side 1 Odds",
        "Side 1 Stake",
        "Side 2 Team",
        "Side 2 Sportsbook",
        "Side 2 Odds",
        "Side 2 Stake",
        "Total Stake",
        "Profit",
    ])?;

    for arb in arbs {
        let [first, second] = &arb.legs;
        writer.write_record([
            arb.sport.clone(),
            arb.line_type.clone(),
            arb.game.clone(),
            arb.market.to_string(),
            first.team.clone(),
            first.book.clone(),
            first.odds.to_string(),
            format!("{:.2}", first.stake),
            second.team.clone(),
            second.book.clone(),
            second.odds.to_string(),
            format!("{:.2}", second.stake),
            format!("{:.2}", arb.total_stake),
            format!("{:.2}", arb.profit),
        ])?;
    }

    writer.flush().context("Failed to write CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, LineType, Market, Quote, SportsData, StakeLeg, Team};
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("sportsbook_odds_ev_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_cache_round_trip() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let event = Event::new(9, start, Team::named("LSU"), Team::named("USC")).with_quotes([
            Quote::moneyline(1, LineType::FullGame, Some(-175), Some(150)),
            Quote::moneyline(5, LineType::Unknown(11), None, Some(140)),
        ]);
        let mut sports = SportsData::new();
        sports.insert("CFB".to_string(), vec![event]);

        let path = temp_path("odds_cache.json");
        save_to_cache(&sports, &path).unwrap();
        let loaded: SportsData = load_from_cache(&path).unwrap();
        assert_eq!(loaded, sports);
    }

    #[test]
    fn test_missing_cache_is_an_error() {
        let result: Result<SportsData> = load_from_cache(temp_path("does_not_exist.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_arbitrage_csv() {
        let leg = |book: &str, team: &str, odds: i32, stake: f64| StakeLeg {
            sportsbook_id: 0,
            book: book.to_string(),
            team: team.to_string(),
            odds,
            stake,
        };
        let arb = ArbitrageResult {
            sport: "NFL".to_string(),
            game_id: 3,
            line_type: "Full Game".to_string(),
            game: "Jets @ Giants".to_string(),
            market: Market::Moneyline,
            legs: [
                leg("FanDuel", "Jets", 120, 50.0),
                leg("DraftKings", "Giants", 120, 50.0),
            ],
            total_stake: 100.0,
            profit: 10.0,
        };

        let path = temp_path("arbs.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        save_arbitrage_to_csv(&[arb], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("Sport,Line Type,Game"));
        assert_eq!(
            lines.next().unwrap(),
            "NFL,Full Game,Jets @ Giants,Moneyline,Jets,FanDuel,120,50.00,Giants,DraftKings,120,50.00,100.00,10.00"
        );
    }
}
