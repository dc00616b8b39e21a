pub mod followup;
pub mod handlers;
pub mod session;
pub mod summary;
