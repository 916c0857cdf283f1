pub mod agent;
pub mod analytics;
pub mod deal;
pub mod flow;
pub mod lead;
pub mod listing;
