use thiserror::Error;

/// Errors raised by the odds math.
///
/// These are per-computation failures: the scanners catch them for the single
/// quote or pairing that produced them and move on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    #[error("Invalid American odds: {0}")]
    InvalidOdds(i32),

    #[error("Invalid decimal odds: {0}")]
    InvalidDecimal(f64),

    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),
}

pub type Result<T> = std::result::Result<T, OddsError>;
