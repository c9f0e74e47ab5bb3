pub mod next_evaluation_policy;
pub mod trading_window_policy;
