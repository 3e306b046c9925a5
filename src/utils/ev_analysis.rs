use crate::models::{EvResult, Event, Market, Quote, Side, SportsData};
use crate::utils::ev_calculator::ev_percentage;
use crate::utils::no_vig::fair_market_odds_for_quote;
use tracing::debug;

/// Lines closer than this are treated as the same number
const POINTS_TOLERANCE: f64 = 0.01;

/// Spreads and totals only compare when both books hang the same number
fn same_line(market: Market, side: Side, observed: &Quote, reference: &Quote) -> bool {
    match market {
        Market::Moneyline => true,
        Market::Spread | Market::Total => {
            match (observed.points(market, side), reference.points(market, side)) {
                (Some(a), Some(b)) => (a - b).abs() < POINTS_TOLERANCE,
                _ => false,
            }
        }
    }
}

/// Every +EV price on one event, measured against the reference book's no-vig
/// line at the same line type. Sides with no reference line are skipped.
pub fn find_event_ev_bets(sport: &str, event: &Event, reference_book_id: i32) -> Vec<EvResult> {
    let mut bets = Vec::new();

    for quote in event.quotes() {
        // Only the reference quote at this exact line type can price this quote
        let Some(reference) = event.quote(reference_book_id, quote.line_type) else {
            continue;
        };

        for market in Market::ALL {
            let Some(fair) = fair_market_odds_for_quote(reference, market) else {
                continue;
            };

            for side in [Side::Away, Side::Home] {
                let Some(odds) = quote.price(market, side) else {
                    continue;
                };
                if !same_line(market, side, quote, reference) {
                    continue;
                }

                let fair_odds = fair.side(side);
                let ev = match ev_percentage(odds, fair_odds) {
                    Ok(ev) => ev,
                    Err(e) => {
                        debug!(
                            game_id = event.game_id,
                            sportsbook_id = quote.sportsbook_id,
                            "Skipping price: {}",
                            e
                        );
                        continue;
                    }
                };

                if ev > 0.0 {
                    bets.push(EvResult {
                        sport: sport.to_string(),
                        game_id: event.game_id,
                        line_type: quote.line_type.label(),
                        game: event.label(),
                        market,
                        team: event.side_label(market, side),
                        points: quote.points(market, side),
                        sportsbook_id: quote.sportsbook_id,
                        book: quote.sportsbook_name().to_string(),
                        odds,
                        fair_odds,
                        ev_percentage: ev,
                    });
                }
            }
        }
    }

    bets
}

/// Find all positive EV bets across every sport, best first.
/// Equal EVs keep their input order.
pub fn find_plus_ev_bets(sports: &SportsData, reference_book_id: i32) -> Vec<EvResult> {
    let mut all_bets: Vec<EvResult> = sports
        .iter()
        .flat_map(|(sport, events)| {
            events
                .iter()
                .flat_map(move |event| find_event_ev_bets(sport, event, reference_book_id))
        })
        .collect();

    // Sort by EV (descending)
    all_bets.sort_by(|a, b| {
        b.ev_percentage
            .partial_cmp(&a.ev_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    all_bets
}
