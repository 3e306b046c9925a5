use crate::error::Result;
use crate::models::{Event, FairOdds, LineType, Market, Quote, Side};
use crate::utils::odds::{american_to_decimal, probability_to_american};

/// Remove the vig from a two-way market priced by a single book.
///
/// Each side's raw implied probability (1 / decimal) is rescaled by the total,
/// so the book's margin is taken off in proportion to each side's probability.
/// Fails with `InvalidOdds` if either price is not a valid American price.
pub fn no_vig_odds(away_odds: i32, home_odds: i32) -> Result<FairOdds> {
    let away_prob = 1.0 / american_to_decimal(away_odds)?;
    let home_prob = 1.0 / american_to_decimal(home_odds)?;
    let total_probability = away_prob + home_prob;

    Ok(FairOdds {
        away: probability_to_american(away_prob / total_probability)?,
        home: probability_to_american(home_prob / total_probability)?,
    })
}

/// Fair odds for one market of a quote. None when either side isn't priced
/// or the prices can't be converted.
pub fn fair_market_odds_for_quote(quote: &Quote, market: Market) -> Option<FairOdds> {
    let away = quote.price(market, Side::Away)?;
    let home = quote.price(market, Side::Home)?;
    no_vig_odds(away, home).ok()
}

/// Fair odds for one market of an event, using the reference book's quote at
/// the given line type. None when the reference book has no usable quote.
pub fn fair_market_odds(
    event: &Event,
    reference_book_id: i32,
    line_type: LineType,
    market: Market,
) -> Option<FairOdds> {
    let reference = event.quote(reference_book_id, line_type)?;
    fair_market_odds_for_quote(reference, market)
}

/// Fair moneyline for one side of an event, as looked up per table cell
pub fn fair_odds(
    side: Side,
    event: &Event,
    reference_book_id: i32,
    line_type: LineType,
) -> Option<i32> {
    fair_market_odds(event, reference_book_id, line_type, Market::Moneyline)
        .map(|fair| fair.side(side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OddsError;
    use crate::models::{Team, PINNACLE_ID};
    use chrono::NaiveDate;

    fn event_with(quotes: Vec<Quote>) -> Event {
        let start = NaiveDate::from_ymd_opt(2024, 10, 12)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Event::new(100, start, Team::named("Texas"), Team::named("Oklahoma")).with_quotes(quotes)
    }

    #[test]
    fn test_worked_example() {
        // 0.4 + 0.6429 = 1.0429 -> 0.3836 / 0.6164
        let fair = no_vig_odds(150, -180).unwrap();
        assert_eq!(fair, FairOdds { away: 161, home: -161 });
    }

    #[test]
    fn test_standard_juice_goes_to_even_money() {
        let fair = no_vig_odds(-110, -110).unwrap();
        assert_eq!(fair.away, fair.home);
        assert_eq!(fair.away, 100);
    }

    #[test]
    fn test_zero_margin_market_is_unchanged() {
        let fair = no_vig_odds(100, -100).unwrap();
        assert_eq!(fair, FairOdds { away: 100, home: 100 });

        let fair = no_vig_odds(150, -150).unwrap();
        assert_eq!(fair, FairOdds { away: 150, home: -150 });
    }

    #[test]
    fn test_fair_prices_are_longer_than_vigged() {
        let fair = no_vig_odds(-250, 200).unwrap();
        assert!(fair.away < -200 && fair.away > -250);
        assert!(fair.home > 200);
    }

    #[test]
    fn test_zero_odds_rejected() {
        assert_eq!(no_vig_odds(0, -110), Err(OddsError::InvalidOdds(0)));
    }

    #[test]
    fn test_fair_odds_lookup() {
        let event = event_with(vec![
            Quote::moneyline(PINNACLE_ID, LineType::FullGame, Some(150), Some(-180)),
            Quote::moneyline(89, LineType::FirstHalf, Some(140), Some(-170)),
        ]);

        assert_eq!(
            fair_odds(Side::Away, &event, PINNACLE_ID, LineType::FullGame),
            Some(161)
        );
        assert_eq!(
            fair_odds(Side::Home, &event, PINNACLE_ID, LineType::FullGame),
            Some(-161)
        );
        // Pinnacle has no first half quote; FanDuel's doesn't count
        assert_eq!(
            fair_odds(Side::Away, &event, PINNACLE_ID, LineType::FirstHalf),
            None
        );
    }

    #[test]
    fn test_missing_side_is_unavailable() {
        let event = event_with(vec![Quote::moneyline(
            PINNACLE_ID,
            LineType::FullGame,
            Some(-120),
            None,
        )]);
        assert_eq!(
            fair_market_odds(&event, PINNACLE_ID, LineType::FullGame, Market::Moneyline),
            None
        );
    }

    #[test]
    fn test_fair_total() {
        let quote = Quote {
            over_under: Some(44.5),
            over_line: Some(-110),
            under_line: Some(-110),
            ..Quote::new(PINNACLE_ID, LineType::FullGame)
        };
        let fair = fair_market_odds_for_quote(&quote, Market::Total).unwrap();
        assert_eq!(fair, FairOdds { away: 100, home: 100 });
        assert_eq!(fair_market_odds_for_quote(&quote, Market::Spread), None);
    }
}
