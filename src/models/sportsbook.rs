/// Pinnacle is the sharp book we use as the no-vig reference by default
pub const PINNACLE_ID: i32 = 1;

/// Sportsbooks we request from the feed, in display order
pub const SPORTSBOOKS: &[(i32, &str)] = &[
    (1, "Pinnacle"),
    (5, "BookMaker"),
    (89, "FanDuel"),
    (83, "DraftKings"),
    (28, "Caesars"),
    (87, "BetMGM"),
    (85, "BetRivers"),
];

/// Display name for a sportsbook id, "Unknown" if it isn't in the table
pub fn sportsbook_name(id: i32) -> &'static str {
    SPORTSBOOKS
        .iter()
        .find(|(book_id, _)| *book_id == id)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// Comma separated ids, as the feed's `sportsbookIDList` parameter expects
pub fn sportsbook_id_list() -> String {
    SPORTSBOOKS
        .iter()
        .map(|(id, _)| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sportsbook_name() {
        assert_eq!(sportsbook_name(PINNACLE_ID), "Pinnacle");
        assert_eq!(sportsbook_name(83), "DraftKings");
        assert_eq!(sportsbook_name(12345), "Unknown");
    }

    #[test]
    fn test_sportsbook_id_list() {
        assert_eq!(sportsbook_id_list(), "1,5,89,83,28,87,85");
    }
}
