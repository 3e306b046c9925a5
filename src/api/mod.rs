pub mod odds_api;

pub use odds_api::{parse_events, OddsFeedClient, ODDS_FEED_BASE_URL};
