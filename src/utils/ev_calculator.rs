use crate::error::Result;
use crate::utils::odds::{american_to_decimal, implied_probability, round_to};

/// Expected value of a bet at `odds`, as a percentage of the stake, assuming
/// `fair_odds` reflects the true probability of that same outcome.
///
/// EV% = (fair probability * decimal payout - 1) * 100, rounded to 2 places.
pub fn ev_percentage(odds: i32, fair_odds: i32) -> Result<f64> {
    let fair_probability = implied_probability(fair_odds)?;
    let payout = american_to_decimal(odds)?;
    Ok(round_to((fair_probability * payout - 1.0) * 100.0, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OddsError;

    #[test]
    fn test_ev_percentage() {
        // Fair +100 is a coin flip, so +110 pays 2.1x on a 50% chance
        assert_eq!(ev_percentage(110, 100).unwrap(), 5.0);
        // Laying -110 on a coin flip
        assert_eq!(ev_percentage(-110, 100).unwrap(), -4.55);
        // Getting the fair price is break even
        assert_eq!(ev_percentage(-161, -161).unwrap(), 0.0);
    }

    #[test]
    fn test_ev_increases_with_better_odds() {
        let fair = -161;
        let mut previous = f64::NEG_INFINITY;
        for odds in [-300, -200, -170, -161, -150, -120, 100, 105, 130, 200] {
            let ev = ev_percentage(odds, fair).unwrap();
            assert!(ev > previous, "{} gave {} after {}", odds, ev, previous);
            previous = ev;
        }
    }

    #[test]
    fn test_zero_odds_are_invalid() {
        assert_eq!(ev_percentage(0, 120), Err(OddsError::InvalidOdds(0)));
        assert_eq!(ev_percentage(120, 0), Err(OddsError::InvalidOdds(0)));
    }
}
