use crate::error::{OddsError, Result};

/// American prices live at +100 and longer or -100 and shorter; anything in
/// between (including 0) is not a price.
fn check_american(odds: i32) -> Result<i32> {
    if odds.unsigned_abs() < 100 {
        return Err(OddsError::InvalidOdds(odds));
    }
    Ok(odds)
}

/// Convert American odds to decimal odds
/// +150 -> 2.5, -150 -> 1.667
pub fn american_to_decimal(odds: i32) -> Result<f64> {
    let odds = check_american(odds)?;
    if odds > 0 {
        Ok(odds as f64 / 100.0 + 1.0)
    } else {
        Ok(100.0 / (odds as f64).abs() + 1.0)
    }
}

/// Convert decimal odds back to American odds.
///
/// Rounds half away from zero. Even money always comes back as +100, never -100.
pub fn decimal_to_american(decimal: f64) -> Result<i32> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(OddsError::InvalidDecimal(decimal));
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };

    if !american.is_finite() || american.abs() > i32::MAX as f64 {
        return Err(OddsError::InvalidDecimal(decimal));
    }

    let american = american as i32;
    Ok(if american == -100 { 100 } else { american })
}

/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn implied_probability(odds: i32) -> Result<f64> {
    let odds = check_american(odds)?;
    if odds > 0 {
        // For positive odds: 100 / (odds + 100)
        Ok(100.0 / (odds as f64 + 100.0))
    } else {
        // For negative odds: |odds| / (|odds| + 100)
        let abs_odds = (odds as f64).abs();
        Ok(abs_odds / (abs_odds + 100.0))
    }
}

/// Convert a probability in (0, 1) to American odds
pub fn probability_to_american(probability: f64) -> Result<i32> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(OddsError::InvalidProbability(probability));
    }
    decimal_to_american(1.0 / probability)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
