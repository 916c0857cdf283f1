pub mod current;
pub mod magic;
pub mod sessions;
pub mod token;

pub use current::{current_identity, session_token_from_request, SessionIdentity};
