pub mod line_type;
pub mod sportsbook;

pub use line_type::LineType;
pub use sportsbook::{sportsbook_id_list, sportsbook_name, PINNACLE_ID, SPORTSBOOKS};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Sport label (e.g. "NFL") -> that sport's events, in feed order
pub type SportsData = BTreeMap<String, Vec<Event>>;

/// Leagues the odds feed serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    CollegeFootball,
    Nfl,
    Mlb,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::CollegeFootball, Sport::Nfl, Sport::Mlb];

    /// The feed's numeric sport id
    pub fn feed_id(self) -> u32 {
        match self {
            Sport::Mlb => 1,
            Sport::Nfl => 2,
            Sport::CollegeFootball => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sport::CollegeFootball => "CFB",
            Sport::Nfl => "NFL",
            Sport::Mlb => "MLB",
        }
    }

    pub fn from_label(label: &str) -> Option<Sport> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two-outcome markets a quote can price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Moneyline,
    Spread,
    Total,
}

impl Market {
    pub const ALL: [Market; 3] = [Market::Moneyline, Market::Spread, Market::Total];

    pub fn label(self) -> &'static str {
        match self {
            Market::Moneyline => "Moneyline",
            Market::Spread => "Spread",
            Market::Total => "Total",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of a two-outcome market. For totals, Away is the over and Home is the under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }
}

/// One sportsbook's prices for one event and one line type.
/// Every price is optional since books don't always hang every market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub sportsbook_id: i32,
    pub line_type: LineType,
    pub away_line: Option<i32>, // American odds
    pub home_line: Option<i32>,
    pub away_points: Option<f64>,
    pub home_points: Option<f64>,
    pub away_points_line: Option<i32>,
    pub home_points_line: Option<i32>,
    pub over_under: Option<f64>,
    pub over_line: Option<i32>,
    pub under_line: Option<i32>,
}

impl Quote {
    /// An empty quote, handy as a base for building one up
    pub fn new(sportsbook_id: i32, line_type: LineType) -> Self {
        Self {
            sportsbook_id,
            line_type,
            away_line: None,
            home_line: None,
            away_points: None,
            home_points: None,
            away_points_line: None,
            home_points_line: None,
            over_under: None,
            over_line: None,
            under_line: None,
        }
    }

    /// Shorthand for a moneyline-only quote
    pub fn moneyline(
        sportsbook_id: i32,
        line_type: LineType,
        away_line: Option<i32>,
        home_line: Option<i32>,
    ) -> Self {
        Self {
            away_line,
            home_line,
            ..Self::new(sportsbook_id, line_type)
        }
    }

    /// The American price for one side of a market
    pub fn price(&self, market: Market, side: Side) -> Option<i32> {
        match (market, side) {
            (Market::Moneyline, Side::Away) => self.away_line,
            (Market::Moneyline, Side::Home) => self.home_line,
            (Market::Spread, Side::Away) => self.away_points_line,
            (Market::Spread, Side::Home) => self.home_points_line,
            (Market::Total, Side::Away) => self.over_line,
            (Market::Total, Side::Home) => self.under_line,
        }
    }

    /// The line the price is attached to (None for moneylines)
    pub fn points(&self, market: Market, side: Side) -> Option<f64> {
        match (market, side) {
            (Market::Moneyline, _) => None,
            (Market::Spread, Side::Away) => self.away_points,
            (Market::Spread, Side::Home) => self.home_points,
            (Market::Total, _) => self.over_under,
        }
    }

    pub fn sportsbook_name(&self) -> &'static str {
        sportsbook_name(self.sportsbook_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<i64>,
    pub name: String,
    pub abbrev: Option<String>,
    pub full_name: String,
    pub wins: u32,
    pub losses: u32,
    pub rank: Option<u32>,
    pub color: Option<String>,
}

impl Team {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            abbrev: None,
            full_name: name.to_string(),
            wins: 0,
            losses: 0,
            rank: None,
            color: None,
        }
    }
}

/// Fields that only some leagues carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SportDetails {
    Football {
        season_type: Option<i32>,
        week: Option<i32>,
    },
    Baseball {
        season_type: Option<i32>,
        inning: Option<String>,
        inning_number: Option<i32>,
    },
    Generic {
        period: Option<String>,
        period_number: Option<i32>,
    },
}

/// A scheduled game and every quote the books have posted for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EventRecord")]
pub struct Event {
    pub game_id: i64,
    pub start_time: NaiveDateTime,
    pub status: Option<i32>,
    pub away_team: Team,
    pub home_team: Team,
    pub away_score: Option<i32>,
    pub home_score: Option<i32>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub tv_stations: Option<String>,
    pub details: SportDetails,
    quotes: Vec<Quote>,
}

/// Serialized form of an event; quotes go back through the dedupe on load
#[derive(Deserialize)]
struct EventRecord {
    game_id: i64,
    start_time: NaiveDateTime,
    status: Option<i32>,
    away_team: Team,
    home_team: Team,
    away_score: Option<i32>,
    home_score: Option<i32>,
    venue: Option<String>,
    location: Option<String>,
    tv_stations: Option<String>,
    details: SportDetails,
    quotes: Vec<Quote>,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        Self {
            game_id: record.game_id,
            start_time: record.start_time,
            status: record.status,
            away_team: record.away_team,
            home_team: record.home_team,
            away_score: record.away_score,
            home_score: record.home_score,
            venue: record.venue,
            location: record.location,
            tv_stations: record.tv_stations,
            details: record.details,
            quotes: Vec::new(),
        }
        .with_quotes(record.quotes)
    }
}

impl Event {
    pub fn new(game_id: i64, start_time: NaiveDateTime, away_team: Team, home_team: Team) -> Self {
        Self {
            game_id,
            start_time,
            status: None,
            away_team,
            home_team,
            away_score: None,
            home_score: None,
            venue: None,
            location: None,
            tv_stations: None,
            details: SportDetails::Generic {
                period: None,
                period_number: None,
            },
            quotes: Vec::new(),
        }
    }

    /// Attach quotes, keeping the first quote seen for each (sportsbook, line type)
    pub fn with_quotes(mut self, quotes: impl IntoIterator<Item = Quote>) -> Self {
        for quote in quotes {
            self.add_quote(quote);
        }
        self
    }

    /// Returns false (and drops the quote) if this book already has a quote for that line type
    pub fn add_quote(&mut self, quote: Quote) -> bool {
        if self.quote(quote.sportsbook_id, quote.line_type).is_some() {
            debug!(
                game_id = self.game_id,
                sportsbook_id = quote.sportsbook_id,
                line_type = %quote.line_type,
                "Dropping duplicate quote"
            );
            return false;
        }
        self.quotes.push(quote);
        true
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn quote(&self, sportsbook_id: i32, line_type: LineType) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.sportsbook_id == sportsbook_id && q.line_type == line_type)
    }

    /// Line types quoted on this event, in order of first appearance
    pub fn line_types(&self) -> Vec<LineType> {
        let mut line_types = Vec::new();
        for quote in &self.quotes {
            if !line_types.contains(&quote.line_type) {
                line_types.push(quote.line_type);
            }
        }
        line_types
    }

    /// "Away @ Home"
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away_team.name, self.home_team.name)
    }

    /// Name of the team (or Over/Under) on one side of a market
    pub fn side_label(&self, market: Market, side: Side) -> String {
        match (market, side) {
            (Market::Total, Side::Away) => "Over".to_string(),
            (Market::Total, Side::Home) => "Under".to_string(),
            (_, Side::Away) => self.away_team.name.clone(),
            (_, Side::Home) => self.home_team.name.clone(),
        }
    }
}

pub fn find_event(events: &[Event], game_id: i64) -> Option<&Event> {
    events.iter().find(|event| event.game_id == game_id)
}

pub fn events_by_status(events: &[Event], status: i32) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.status == Some(status))
        .collect()
}

pub fn events_on_date(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.start_time.date() == date)
        .collect()
}

/// No-vig prices for both sides of one market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairOdds {
    pub away: i32,
    pub home: i32,
}

impl FairOdds {
    pub fn side(&self, side: Side) -> i32 {
        match side {
            Side::Away => self.away,
            Side::Home => self.home,
        }
    }
}

/// A price that beats the no-vig line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvResult {
    pub sport: String,
    pub game_id: i64,
    pub line_type: String,
    pub game: String,
    pub market: Market,
    pub team: String,
    pub points: Option<f64>,
    pub sportsbook_id: i32,
    pub book: String,
    pub odds: i32,
    pub fair_odds: i32,
    pub ev_percentage: f64,
}

impl EvResult {
    pub fn format(&self) -> String {
        let points = match self.points {
            Some(points) if self.market == Market::Spread => format!(" {:+.1}", points),
            Some(points) => format!(" {:.1}", points),
            None => String::new(),
        };
        format!(
            "[{}] {} ({}) | {}: {}{} ({:+}) on {} | Fair: {:+} | EV: {:+.2}%",
            self.sport,
            self.game,
            self.line_type,
            self.market,
            self.team,
            points,
            self.odds,
            self.book,
            self.fair_odds,
            self.ev_percentage
        )
    }
}

/// One leg of an arbitrage split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeLeg {
    pub sportsbook_id: i32,
    pub book: String,
    pub team: String,
    pub odds: i32,
    pub stake: f64,
}

/// A two-book split that pays out the same whichever side wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    pub sport: String,
    pub game_id: i64,
    pub line_type: String,
    pub game: String,
    pub market: Market,
    pub legs: [StakeLeg; 2],
    pub total_stake: f64,
    pub profit: f64,
}

impl ArbitrageResult {
    pub fn format(&self) -> String {
        let [first, second] = &self.legs;
        format!(
            "[{}] {} ({}) | {}: {} ({:+}) on {} [${:.2}] | {} ({:+}) on {} [${:.2}] | Profit: ${:.2} on ${:.2}",
            self.sport,
            self.game,
            self.line_type,
            self.market,
            first.team,
            first.odds,
            first.book,
            first.stake,
            second.team,
            second.odds,
            second.book,
            second.stake,
            self.profit,
            self.total_stake
        )
    }
}
