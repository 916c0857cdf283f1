pub mod agents;
pub mod analytics;
pub mod auth;
pub mod connection;
pub mod deals;
pub mod flow;
pub mod leads;
pub mod listings;
pub mod magic_auth;
pub mod plans;
pub mod users;

pub use connection::{init_db, Database};
