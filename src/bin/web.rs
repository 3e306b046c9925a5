use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use sportsbook_odds_ev::no_vig::{fair_market_odds_for_quote, fair_odds};
use sportsbook_odds_ev::odds::american_to_decimal;
use sportsbook_odds_ev::{
    fetch_all_odds_data, ArbitrageResult, Config, EvResult, Event, LineType, Market, OddsData,
    Side, SPORTSBOOKS,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

// Custom filters for formatting
mod filters {
    pub fn format_odds(odds: &i32) -> ::askama::Result<String> {
        Ok(format!("{:+}", odds))
    }

    pub fn format_percent(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:+.2}%", value))
    }

    pub fn format_money(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}", value))
    }
}

struct SportSummary {
    sport: String,
    events: usize,
    ev_bets: usize,
    arbitrages: usize,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    active_page: String,
    sports: Vec<String>,
    summaries: Vec<SportSummary>,
    top_bets: Vec<EvResult>,
}

#[derive(Template)]
#[template(path = "ev.html")]
struct EvTemplate {
    active_page: String,
    sports: Vec<String>,
    ev_bets: Vec<EvResult>,
}

#[derive(Template)]
#[template(path = "arbitrage.html")]
struct ArbitrageTemplate {
    active_page: String,
    sports: Vec<String>,
    arbitrages: Vec<ArbitrageResult>,
}

struct BoardCell {
    text: String,
    highlight: bool,
    best: bool,
}

struct BoardRow {
    team: String,
    fair: String,
    cells: Vec<BoardCell>,
}

struct BoardTable {
    title: String,
    date: String,
    location: String,
    rows: Vec<BoardRow>,
}

struct BoardTab {
    label: String,
    href: String,
    active: bool,
}

#[derive(Template)]
#[template(path = "odds.html")]
struct OddsTemplate {
    active_page: String,
    sports: Vec<String>,
    sport: String,
    market_tabs: Vec<BoardTab>,
    line_type_label: String,
    books: Vec<String>,
    tables: Vec<BoardTable>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    data: Arc<RwLock<Option<OddsData>>>,
    reference_book_id: i32,
}

fn not_loaded() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response()
}

fn sport_labels(data: &OddsData) -> Vec<String> {
    data.sports.keys().cloned().collect()
}

async fn home(State(state): State<AppState>) -> Response {
    let guard = state.data.read().await;
    let Some(data) = guard.as_ref() else {
        return not_loaded();
    };

    let summaries = data
        .sports
        .iter()
        .map(|(sport, events)| SportSummary {
            sport: sport.clone(),
            events: events.len(),
            ev_bets: data.ev_bets.iter().filter(|b| &b.sport == sport).count(),
            arbitrages: data.arbitrages.iter().filter(|a| &a.sport == sport).count(),
        })
        .collect();

    HtmlTemplate(HomeTemplate {
        active_page: "home".to_string(),
        sports: sport_labels(data),
        summaries,
        top_bets: data.ev_bets.iter().take(3).cloned().collect(),
    })
    .into_response()
}

async fn ev_bets(State(state): State<AppState>) -> Response {
    let guard = state.data.read().await;
    let Some(data) = guard.as_ref() else {
        return not_loaded();
    };

    HtmlTemplate(EvTemplate {
        active_page: "ev".to_string(),
        sports: sport_labels(data),
        ev_bets: data.ev_bets.clone(),
    })
    .into_response()
}

async fn arbitrage(State(state): State<AppState>) -> Response {
    let guard = state.data.read().await;
    let Some(data) = guard.as_ref() else {
        return not_loaded();
    };

    HtmlTemplate(ArbitrageTemplate {
        active_page: "arbitrage".to_string(),
        sports: sport_labels(data),
        arbitrages: data.arbitrages.clone(),
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
struct BoardQuery {
    market: Option<String>,
    line_type: Option<i32>,
}

fn parse_market(market: Option<&str>) -> Market {
    match market.map(|m| m.to_ascii_lowercase()).as_deref() {
        Some("spread") => Market::Spread,
        Some("total") => Market::Total,
        _ => Market::Moneyline,
    }
}

fn format_price(price: Option<i32>) -> String {
    price
        .map(|p| format!("{:+}", p))
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_points(points: Option<f64>, signed: bool) -> String {
    match points {
        Some(p) if signed => format!("{:+.1}", p),
        Some(p) => format!("{:.1}", p),
        None => "N/A".to_string(),
    }
}

/// Key identifying one highlighted cell: game, book, line type, market, side label
type CellKey = (i64, i32, String, Market, String);

fn board_table(
    event: &Event,
    market: Market,
    line_type: LineType,
    reference_book_id: i32,
    plus_ev: &HashSet<CellKey>,
) -> BoardTable {
    let rows = [Side::Away, Side::Home]
        .into_iter()
        .map(|side| {
            let team = event.side_label(market, side);
            let fair = match market {
                Market::Moneyline => fair_odds(side, event, reference_book_id, line_type),
                // Without the reference number there is nothing to compare a spread or total to
                _ => event
                    .quote(reference_book_id, line_type)
                    .filter(|reference| reference.points(market, side).is_some())
                    .and_then(|reference| fair_market_odds_for_quote(reference, market))
                    .map(|fair| fair.side(side)),
            };

            let prices: Vec<Option<f64>> = SPORTSBOOKS
                .iter()
                .map(|(book_id, _)| {
                    event
                        .quote(*book_id, line_type)
                        .and_then(|quote| quote.price(market, side))
                        .and_then(|price| american_to_decimal(price).ok())
                })
                .collect();
            // Best price for the bettor is the longest payout in the row
            let best_price = prices.iter().flatten().copied().reduce(f64::max);

            let cells = SPORTSBOOKS
                .iter()
                .zip(&prices)
                .map(|((book_id, _), decimal)| match event.quote(*book_id, line_type) {
                    Some(quote) => {
                        let price = format_price(quote.price(market, side));
                        let text = match market {
                            Market::Moneyline => price,
                            Market::Spread => format!(
                                "{} ({})",
                                format_points(quote.points(market, side), true),
                                price
                            ),
                            Market::Total => format!(
                                "{} {} ({})",
                                if side == Side::Away { "O" } else { "U" },
                                format_points(quote.points(market, side), false),
                                price
                            ),
                        };
                        let key = (
                            event.game_id,
                            *book_id,
                            line_type.label(),
                            market,
                            team.clone(),
                        );
                        BoardCell {
                            text,
                            highlight: plus_ev.contains(&key),
                            best: decimal.is_some() && *decimal == best_price,
                        }
                    }
                    None => BoardCell {
                        text: "N/A".to_string(),
                        highlight: false,
                        best: false,
                    },
                })
                .collect();

            BoardRow {
                team,
                fair: format_price(fair),
                cells,
            }
        })
        .collect();

    BoardTable {
        title: event.label(),
        date: event.start_time.format("%Y-%m-%d %H:%M").to_string(),
        location: event.location.clone().unwrap_or_default(),
        rows,
    }
}

async fn odds_board(
    State(state): State<AppState>,
    Path(sport): Path<String>,
    Query(query): Query<BoardQuery>,
) -> Response {
    let guard = state.data.read().await;
    let Some(data) = guard.as_ref() else {
        return not_loaded();
    };
    let Some(events) = data.sports.get(&sport) else {
        return (StatusCode::NOT_FOUND, format!("No odds for {}", sport)).into_response();
    };

    let market = parse_market(query.market.as_deref());
    let line_type = query
        .line_type
        .map(LineType::from)
        .unwrap_or(LineType::FullGame);

    let plus_ev: HashSet<CellKey> = data
        .ev_bets
        .iter()
        .filter(|bet| bet.sport == sport)
        .map(|bet| {
            (
                bet.game_id,
                bet.sportsbook_id,
                bet.line_type.clone(),
                bet.market,
                bet.team.clone(),
            )
        })
        .collect();

    let tables = events
        .iter()
        .map(|event| board_table(event, market, line_type, state.reference_book_id, &plus_ev))
        .collect();

    let market_tabs = Market::ALL
        .into_iter()
        .map(|m| BoardTab {
            label: m.label().to_string(),
            href: format!(
                "/odds/{}?market={}&line_type={}",
                sport,
                m.label().to_lowercase(),
                line_type.code()
            ),
            active: m == market,
        })
        .collect();

    HtmlTemplate(OddsTemplate {
        active_page: sport.clone(),
        sports: sport_labels(data),
        sport,
        market_tabs,
        line_type_label: line_type.label(),
        books: SPORTSBOOKS.iter().map(|(_, name)| name.to_string()).collect(),
        tables,
    })
    .into_response()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    info!("Fetching odds data...");

    // Fetch data on startup
    let data = match fetch_all_odds_data(&config).await {
        Ok(data) => {
            info!(
                ev_bets = data.ev_bets.len(),
                arbitrages = data.arbitrages.len(),
                "Data loaded successfully"
            );
            Some(data)
        }
        Err(e) => {
            error!("Error fetching data: {:#}", e);
            error!("Server will start but pages may show errors");
            None
        }
    };

    let state = AppState {
        data: Arc::new(RwLock::new(data)),
        reference_book_id: config.reference_book_id,
    };

    // Build router with routes
    let app = Router::new()
        .route("/", get(home))
        .route("/ev", get(ev_bets))
        .route("/arbitrage", get(arbitrage))
        .route("/odds/:sport", get(odds_board))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.web_addr).await?;
    info!("Starting web server at http://{}", config.web_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
