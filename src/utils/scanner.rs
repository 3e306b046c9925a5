use crate::models::{ArbitrageResult, EvResult, SportsData, PINNACLE_ID};
use crate::utils::arbitrage::{find_moneyline_arbitrage, DEFAULT_TOTAL_STAKE};
use crate::utils::ev_analysis::find_plus_ev_bets;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Knobs for a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Book whose two-way prices define the no-vig line
    pub reference_book_id: i32,
    /// Amount split across the legs of each arbitrage
    pub total_stake: f64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            reference_book_id: PINNACLE_ID,
            total_stake: DEFAULT_TOTAL_STAKE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResults {
    pub ev_bets: Vec<EvResult>,
    pub arbitrages: Vec<ArbitrageResult>,
}

/// Run the +EV and arbitrage scans one after the other
pub fn scan_sports(sports: &SportsData, settings: &ScanSettings) -> ScanResults {
    let ev_bets = find_plus_ev_bets(sports, settings.reference_book_id);
    let arbitrages = find_moneyline_arbitrage(sports, settings.total_stake);

    info!(
        ev_bets = ev_bets.len(),
        arbitrages = arbitrages.len(),
        "Scan complete"
    );

    ScanResults {
        ev_bets,
        arbitrages,
    }
}

/// Run both scans at the same time on the blocking pool. Neither scan touches
/// shared state, so the result is the same as `scan_sports`.
pub async fn scan_sports_concurrently(
    sports: Arc<SportsData>,
    settings: ScanSettings,
) -> anyhow::Result<ScanResults> {
    let ev_sports = Arc::clone(&sports);
    let ev_task = tokio::task::spawn_blocking(move || {
        find_plus_ev_bets(&ev_sports, settings.reference_book_id)
    });
    let arb_task = tokio::task::spawn_blocking(move || {
        find_moneyline_arbitrage(&sports, settings.total_stake)
    });

    let (ev_bets, arbitrages) = tokio::try_join!(ev_task, arb_task)?;

    info!(
        ev_bets = ev_bets.len(),
        arbitrages = arbitrages.len(),
        "Scan complete"
    );

    Ok(ScanResults {
        ev_bets,
        arbitrages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, LineType, Quote, Team};
    use chrono::NaiveDate;

    fn sample_sports() -> SportsData {
        let start = NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(18, 10, 0)
            .unwrap();
        let game = Event::new(55, start, Team::named("Mets"), Team::named("Nationals"))
            .with_quotes([
                Quote::moneyline(PINNACLE_ID, LineType::FullGame, Some(-125), Some(115)),
                Quote::moneyline(89, LineType::FullGame, Some(110), Some(-130)),
                Quote::moneyline(83, LineType::FullGame, Some(-135), Some(125)),
                Quote::moneyline(87, LineType::FirstHalf, Some(105), Some(-125)),
            ]);
        let mut sports = SportsData::new();
        sports.insert("MLB".to_string(), vec![game]);
        sports
    }

    #[test]
    fn test_scan_is_idempotent() {
        let sports = sample_sports();
        let settings = ScanSettings::default();

        let first = scan_sports(&sports, &settings);
        let second = scan_sports(&sports, &settings);
        assert_eq!(first, second);
        assert!(!first.ev_bets.is_empty());
        assert!(!first.arbitrages.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_scan_matches_sequential() {
        let sports = sample_sports();
        let settings = ScanSettings::default();

        let sequential = scan_sports(&sports, &settings);
        let concurrent = scan_sports_concurrently(Arc::new(sports), settings)
            .await
            .unwrap();
        assert_eq!(sequential, concurrent);
    }
}
