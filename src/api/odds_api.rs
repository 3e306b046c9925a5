use crate::models::{
    sportsbook_id_list, Event, LineType, Quote, Sport, SportDetails, SportsData, Team,
};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const ODDS_FEED_BASE_URL: &str =
    "https://www.lunosoftware.com/sportsdata/SportsDataService.svc";
const START_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Null, missing, or non-numeric prices become None instead of failing the record
fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|v| v.fract() == 0.0 && v.abs() <= i32::MAX as f64)
        .map(|v| v as i32))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|v| v.fract() == 0.0)
        .map(|v| v as i64))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64).filter(|v| v.is_finite()))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32))
}

/// One sportsbook's line as the feed sends it
#[derive(Debug, Deserialize)]
struct FeedOdds {
    #[serde(rename = "SportsbookID", default, deserialize_with = "lenient_i32")]
    sportsbook_id: Option<i32>,
    #[serde(rename = "LineType", default, deserialize_with = "lenient_i32")]
    line_type: Option<i32>,
    #[serde(rename = "AwayLine", default, deserialize_with = "lenient_i32")]
    away_line: Option<i32>,
    #[serde(rename = "HomeLine", default, deserialize_with = "lenient_i32")]
    home_line: Option<i32>,
    #[serde(rename = "AwayPoints", default, deserialize_with = "lenient_f64")]
    away_points: Option<f64>,
    #[serde(rename = "HomePoints", default, deserialize_with = "lenient_f64")]
    home_points: Option<f64>,
    #[serde(rename = "AwayPointsLine", default, deserialize_with = "lenient_i32")]
    away_points_line: Option<i32>,
    #[serde(rename = "HomePointsLine", default, deserialize_with = "lenient_i32")]
    home_points_line: Option<i32>,
    #[serde(rename = "OverUnder", default, deserialize_with = "lenient_f64")]
    over_under: Option<f64>,
    #[serde(rename = "OverLine", default, deserialize_with = "lenient_i32")]
    over_line: Option<i32>,
    #[serde(rename = "UnderLine", default, deserialize_with = "lenient_i32")]
    under_line: Option<i32>,
}

impl FeedOdds {
    fn into_quote(self) -> Option<Quote> {
        Some(Quote {
            sportsbook_id: self.sportsbook_id?,
            line_type: LineType::from(self.line_type?),
            away_line: self.away_line,
            home_line: self.home_line,
            away_points: self.away_points,
            home_points: self.home_points,
            away_points_line: self.away_points_line,
            home_points_line: self.home_points_line,
            over_under: self.over_under,
            over_line: self.over_line,
            under_line: self.under_line,
        })
    }
}

/// A game as the feed sends it
#[derive(Debug, Deserialize)]
struct FeedEvent {
    #[serde(rename = "GameID", default, deserialize_with = "lenient_i64")]
    game_id: Option<i64>,
    #[serde(rename = "StartTimeStr", default)]
    start_time: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_i32")]
    status: Option<i32>,

    #[serde(rename = "AwayTeamID", default, deserialize_with = "lenient_i64")]
    away_team_id: Option<i64>,
    #[serde(rename = "AwayTeamName", default)]
    away_team_name: Option<String>,
    #[serde(rename = "AwayTeamAbbrev", default)]
    away_team_abbrev: Option<String>,
    #[serde(rename = "AwayTeamFullName", default)]
    away_team_full_name: Option<String>,
    #[serde(rename = "AwayTeamWins", default, deserialize_with = "lenient_u32")]
    away_team_wins: Option<u32>,
    #[serde(rename = "AwayTeamLosses", default, deserialize_with = "lenient_u32")]
    away_team_losses: Option<u32>,
    #[serde(rename = "AwayTeamRank", default, deserialize_with = "lenient_u32")]
    away_team_rank: Option<u32>,
    #[serde(rename = "AwayTeamColor", default)]
    away_team_color: Option<String>,

    #[serde(rename = "HomeTeamID", default, deserialize_with = "lenient_i64")]
    home_team_id: Option<i64>,
    #[serde(rename = "HomeTeamName", default)]
    home_team_name: Option<String>,
    #[serde(rename = "HomeTeamAbbrev", default)]
    home_team_abbrev: Option<String>,
    #[serde(rename = "HomeTeamFullName", default)]
    home_team_full_name: Option<String>,
    #[serde(rename = "HomeTeamWins", default, deserialize_with = "lenient_u32")]
    home_team_wins: Option<u32>,
    #[serde(rename = "HomeTeamLosses", default, deserialize_with = "lenient_u32")]
    home_team_losses: Option<u32>,
    #[serde(rename = "HomeTeamRank", default, deserialize_with = "lenient_u32")]
    home_team_rank: Option<u32>,
    #[serde(rename = "HomeTeamColor", default)]
    home_team_color: Option<String>,

    #[serde(rename = "AwayScore", default, deserialize_with = "lenient_i32")]
    away_score: Option<i32>,
    #[serde(rename = "HomeScore", default, deserialize_with = "lenient_i32")]
    home_score: Option<i32>,
    #[serde(rename = "Period", default)]
    period: Option<String>,
    #[serde(rename = "PeriodNumber", default, deserialize_with = "lenient_i32")]
    period_number: Option<i32>,
    #[serde(rename = "Venue", default)]
    venue: Option<String>,
    #[serde(rename = "Location", default)]
    location: Option<String>,
    #[serde(rename = "TVStations", default)]
    tv_stations: Option<String>,
    #[serde(rename = "SeasonType", default, deserialize_with = "lenient_i32")]
    season_type: Option<i32>,
    #[serde(rename = "Week", default, deserialize_with = "lenient_i32")]
    week: Option<i32>,

    #[serde(rename = "Odds", default)]
    odds: Vec<FeedOdds>,
}

#[allow(clippy::too_many_arguments)]
fn feed_team(
    id: Option<i64>,
    name: Option<String>,
    abbrev: Option<String>,
    full_name: Option<String>,
    wins: Option<u32>,
    losses: Option<u32>,
    rank: Option<u32>,
    color: Option<String>,
) -> Team {
    let name = name.unwrap_or_default();
    Team {
        id,
        full_name: full_name.unwrap_or_else(|| name.clone()),
        name,
        abbrev,
        wins: wins.unwrap_or(0),
        losses: losses.unwrap_or(0),
        rank,
        color,
    }
}

impl FeedEvent {
    fn into_event(self, sport: Sport) -> Result<Event> {
        let game_id = self.game_id.context("Missing GameID")?;
        let start_time_str = self.start_time.context("Missing StartTimeStr")?;
        let start_time = NaiveDateTime::parse_from_str(start_time_str.trim(), START_TIME_FORMAT)
            .with_context(|| format!("Invalid start time '{}'", start_time_str))?;

        let away_team = feed_team(
            self.away_team_id,
            self.away_team_name,
            self.away_team_abbrev,
            self.away_team_full_name,
            self.away_team_wins,
            self.away_team_losses,
            self.away_team_rank,
            self.away_team_color,
        );
        let home_team = feed_team(
            self.home_team_id,
            self.home_team_name,
            self.home_team_abbrev,
            self.home_team_full_name,
            self.home_team_wins,
            self.home_team_losses,
            self.home_team_rank,
            self.home_team_color,
        );

        let details = match sport {
            Sport::CollegeFootball | Sport::Nfl => SportDetails::Football {
                season_type: self.season_type,
                week: self.week,
            },
            Sport::Mlb => SportDetails::Baseball {
                season_type: self.season_type,
                inning: self.period,
                inning_number: self.period_number,
            },
        };

        let mut event = Event::new(game_id, start_time, away_team, home_team);
        event.status = self.status;
        event.away_score = self.away_score;
        event.home_score = self.home_score;
        event.venue = self.venue;
        event.location = self.location;
        event.tv_stations = self.tv_stations;
        event.details = details;

        let quotes = self.odds.into_iter().filter_map(|odds| {
            let quote = odds.into_quote();
            if quote.is_none() {
                debug!(game_id, "Skipping odds without a sportsbook or line type");
            }
            quote
        });

        Ok(event.with_quotes(quotes))
    }
}

/// Turn the feed's JSON array into events. Records that can't be read are
/// logged and skipped so one bad game doesn't drop the whole slate.
pub fn parse_events(json: &str, sport: Sport) -> Result<Vec<Event>> {
    let records: Vec<Value> =
        serde_json::from_str(json).context("Failed to parse odds feed response")?;

    let mut events = Vec::with_capacity(records.len());
    for record in records {
        let parsed = serde_json::from_value::<FeedEvent>(record)
            .map_err(anyhow::Error::from)
            .and_then(|feed_event| feed_event.into_event(sport));
        match parsed {
            Ok(event) => events.push(event),
            Err(e) => warn!(sport = %sport, "Skipping feed record: {:#}", e),
        }
    }

    Ok(events)
}

pub struct OddsFeedClient {
    base_url: String,
    client: reqwest::Client,
}

impl OddsFeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch this week's games with odds from every sportsbook we track
    pub async fn fetch_events(&self, sport: Sport) -> Result<Vec<Event>> {
        let url = format!(
            "{}/gamesOddsForDateWeek/{}",
            self.base_url.trim_end_matches('/'),
            sport.feed_id()
        );

        let response = self
            .client
            .get(&url)
            .query(&[("sportsbookIDList", sportsbook_id_list())])
            .send()
            .await
            .with_context(|| format!("Failed to fetch {} odds", sport))?;

        if !response.status().is_success() {
            anyhow::bail!("Odds feed returned error for {}: {}", sport, response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read odds feed response")?;

        let events = parse_events(&body, sport)?;
        info!(sport = %sport, events = events.len(), "Fetched odds");
        Ok(events)
    }

    /// Fetch several sports, keyed by sport label
    pub async fn fetch_sports(&self, sports: &[Sport]) -> Result<SportsData> {
        let mut data = SportsData::new();
        for &sport in sports {
            let events = self.fetch_events(sport).await?;
            data.insert(sport.label().to_string(), events);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PINNACLE_ID;

    const SAMPLE: &str = r#"[
        {
            "GameID": 4412,
            "StartTimeStr": "09/08/2024 13:00",
            "Status": 1,
            "AwayTeamID": 4,
            "AwayTeamName": "Bills",
            "AwayTeamWins": 1,
            "HomeTeamName": "Dolphins",
            "HomeTeamFullName": "Miami Dolphins",
            "SeasonType": 1,
            "Week": 2,
            "Odds": [
                {"SportsbookID": 1, "LineType": 1, "AwayLine": 150, "HomeLine": -180,
                 "AwayPoints": 3.5, "HomePoints": -3.5, "AwayPointsLine": -110, "HomePointsLine": -110,
                 "OverUnder": 48.5, "OverLine": -108, "UnderLine": -112},
                {"SportsbookID": 89, "LineType": 1, "AwayLine": "N/A", "HomeLine": null},
                {"SportsbookID": 89, "LineType": 1, "AwayLine": 160, "HomeLine": -190},
                {"SportsbookID": 83, "LineType": 12, "AwayLine": "+145", "HomeLine": -170.0},
                {"LineType": 1, "AwayLine": 150}
            ]
        },
        {
            "GameID": 4413,
            "StartTimeStr": "not a date",
            "AwayTeamName": "Jets",
            "HomeTeamName": "Patriots"
        }
    ]"#;

    #[test]
    fn test_parse_events() {
        let events = parse_events(SAMPLE, Sport::Nfl).unwrap();
        // The second record has a broken start time
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.game_id, 4412);
        assert_eq!(event.label(), "Bills @ Dolphins");
        assert_eq!(event.away_team.full_name, "Bills");
        assert_eq!(event.home_team.full_name, "Miami Dolphins");
        assert_eq!(event.away_team.wins, 1);
        assert_eq!(
            event.details,
            SportDetails::Football {
                season_type: Some(1),
                week: Some(2)
            }
        );

        // Duplicate FanDuel quote dropped (first wins), quote without a book dropped
        assert_eq!(event.quotes().len(), 3);
        let fanduel = event.quote(89, LineType::FullGame).unwrap();
        assert_eq!(fanduel.away_line, None);
        assert_eq!(fanduel.home_line, None);

        let pinnacle = event.quote(PINNACLE_ID, LineType::FullGame).unwrap();
        assert_eq!(pinnacle.over_under, Some(48.5));
        assert_eq!(pinnacle.under_line, Some(-112));

        let draftkings = event.quote(83, LineType::Unknown(12)).unwrap();
        assert_eq!(draftkings.away_line, Some(145));
        assert_eq!(draftkings.home_line, Some(-170));
    }

    #[test]
    fn test_baseball_details() {
        let json = r#"[{"GameID": 1, "StartTimeStr": "07/04/2024 18:10",
            "Period": "Top 3rd", "PeriodNumber": 3, "SeasonType": 1}]"#;
        let events = parse_events(json, Sport::Mlb).unwrap();
        assert_eq!(
            events[0].details,
            SportDetails::Baseball {
                season_type: Some(1),
                inning: Some("Top 3rd".to_string()),
                inning_number: Some(3)
            }
        );
    }

    #[test]
    fn test_not_an_array_is_an_error() {
        assert!(parse_events("{\"error\": true}", Sport::Nfl).is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_events() {
        let client = OddsFeedClient::new(ODDS_FEED_BASE_URL);
        let events = client.fetch_events(Sport::Nfl).await.unwrap();
        assert!(events.iter().all(|event| event.game_id > 0));
    }
}
