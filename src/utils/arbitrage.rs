use crate::models::{
    sportsbook_name, ArbitrageResult, Event, Market, Quote, Side, SportsData, StakeLeg,
};
use crate::utils::odds::{implied_probability, round_to};
use tracing::debug;

/// Default amount split across the two legs of an arbitrage
pub const DEFAULT_TOTAL_STAKE: f64 = 100.0;

/// One bet in a guaranteed-profit split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbitrageLeg {
    pub sportsbook_id: i32,
    pub side: Side,
    pub odds: i32,
    pub stake: f64,
}

/// Stake allocation for a two-book moneyline arbitrage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbitrageSplit {
    pub first: ArbitrageLeg,
    pub second: ArbitrageLeg,
    pub total_stake: f64,
    pub profit: f64,
}

/// Check one pairing: `side` of `first` against the other side of `second`.
fn price_pairing(first: &Quote, second: &Quote, side: Side, total_stake: f64) -> Option<ArbitrageSplit> {
    let first_odds = first.price(Market::Moneyline, side)?;
    let second_odds = second.price(Market::Moneyline, side.opposite())?;

    let first_prob = implied_probability(first_odds).ok()?;
    let second_prob = implied_probability(second_odds).ok()?;

    // Total implied probability under 1 means the books disagree enough to lock in a profit
    let total_prob = first_prob + second_prob;
    if !total_prob.is_finite() || total_prob <= 0.0 || total_prob >= 1.0 {
        return None;
    }

    let profit = round_to(total_stake / total_prob - total_stake, 2);
    if profit <= 0.0 {
        return None;
    }

    // Staking in proportion to each leg's probability makes both legs pay the same
    let first_stake = round_to(total_stake * first_prob / total_prob, 2);
    let second_stake = total_stake - first_stake;

    Some(ArbitrageSplit {
        first: ArbitrageLeg {
            sportsbook_id: first.sportsbook_id,
            side,
            odds: first_odds,
            stake: first_stake,
        },
        second: ArbitrageLeg {
            sportsbook_id: second.sportsbook_id,
            side: side.opposite(),
            odds: second_odds,
            stake: second_stake,
        },
        total_stake,
        profit,
    })
}

/// Look for a moneyline arbitrage between two quotes on the same event and line type.
///
/// Both pairings are checked: first's away with second's home, and first's home
/// with second's away. If both work, the more profitable one wins; on a tie the
/// pairing with the away leg on `first` is kept. Quotes from the same book never
/// form an arbitrage, and missing or invalid prices make a pairing ineligible.
pub fn detect_arbitrage(first: &Quote, second: &Quote, total_stake: f64) -> Option<ArbitrageSplit> {
    if first.sportsbook_id == second.sportsbook_id || first.line_type != second.line_type {
        return None;
    }

    let away_first = price_pairing(first, second, Side::Away, total_stake);
    let home_first = price_pairing(first, second, Side::Home, total_stake);

    match (away_first, home_first) {
        (Some(a), Some(b)) => Some(if b.profit > a.profit { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn stake_leg(event: &Event, leg: &ArbitrageLeg) -> StakeLeg {
    StakeLeg {
        sportsbook_id: leg.sportsbook_id,
        book: sportsbook_name(leg.sportsbook_id).to_string(),
        team: event.side_label(Market::Moneyline, leg.side),
        odds: leg.odds,
        stake: leg.stake,
    }
}

/// All moneyline arbitrages on one event: quotes are grouped by line type and
/// every pair of books inside a group is checked.
pub fn find_event_arbitrage(sport: &str, event: &Event, total_stake: f64) -> Vec<ArbitrageResult> {
    let mut results = Vec::new();

    for line_type in event.line_types() {
        let group: Vec<&Quote> = event
            .quotes()
            .iter()
            .filter(|quote| quote.line_type == line_type)
            .collect();

        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                // Lower book id always goes first so the tie-break doesn't depend on feed order
                let (first, second) = if group[i].sportsbook_id <= group[j].sportsbook_id {
                    (group[i], group[j])
                } else {
                    (group[j], group[i])
                };

                if let Some(split) = detect_arbitrage(first, second, total_stake) {
                    debug!(
                        game_id = event.game_id,
                        line_type = %line_type,
                        profit = split.profit,
                        "Found arbitrage"
                    );
                    results.push(ArbitrageResult {
                        sport: sport.to_string(),
                        game_id: event.game_id,
                        line_type: line_type.label(),
                        game: event.label(),
                        market: Market::Moneyline,
                        legs: [stake_leg(event, &split.first), stake_leg(event, &split.second)],
                        total_stake: split.total_stake,
                        profit: split.profit,
                    });
                }
            }
        }
    }

    results
}

/// Find moneyline arbitrage across every sport, sorted by profit (descending).
/// Equal profits keep their input order.
pub fn find_moneyline_arbitrage(sports: &SportsData, total_stake: f64) -> Vec<ArbitrageResult> {
    let mut arbitrage_opportunities: Vec<ArbitrageResult> = sports
        .iter()
        .flat_map(|(sport, events)| {
            events
                .iter()
                .flat_map(move |event| find_event_arbitrage(sport, event, total_stake))
        })
        .collect();

    // Sort by profit (descending)
    arbitrage_opportunities.sort_by(|a, b| {
        b.profit
            .partial_cmp(&a.profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    arbitrage_opportunities
}
