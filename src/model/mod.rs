pub mod constants;
pub mod eligibility;
pub mod error;
pub mod exclusion;
pub mod politician_tracker;
pub mod ranking;
pub mod rating_updater;
pub mod replay;
pub mod structures;
pub mod ticket_builder;
