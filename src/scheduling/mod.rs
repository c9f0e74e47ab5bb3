pub mod execution_state;
pub mod policies;
pub mod policy_chain;
pub mod reevaluation_interval;
pub mod schedule_context;
pub mod shortfall_scheduler;
pub mod types;
