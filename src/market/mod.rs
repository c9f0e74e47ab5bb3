pub mod market_source;
pub mod simulated_market;
pub mod vwap_tracker;
