pub mod analytics;
pub mod auth;
pub mod chat;
pub mod health;
pub mod waitlist;

pub use health::{AppStartTime, HealthService};
