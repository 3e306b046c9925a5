pub mod arbitrage;
pub mod data;
pub mod ev_analysis;
pub mod ev_calculator;
pub mod no_vig;
pub mod odds;
pub mod scanner;
